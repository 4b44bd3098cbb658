//! JSON object bodies.

use super::BodyDecoder;
use crate::variables::{Value, VariableMap};

/// Accepts JSON objects only; arrays and scalars are left to later stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl BodyDecoder for JsonDecoder {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn attempt(&self, input: &str) -> Option<VariableMap> {
        let json: serde_json::Value = serde_json::from_str(input).ok()?;
        match Value::from(json) {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_object() {
        let map = JsonDecoder
            .attempt(r#"{"user": {"id": "42", "roles": ["admin"]}}"#)
            .unwrap();
        assert_eq!(map.lookup("user.id"), Some(&Value::from("42")));
        assert_eq!(
            map.lookup("user.roles"),
            Some(&Value::Sequence(vec![Value::from("admin")]))
        );
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(JsonDecoder.attempt("[1, 2, 3]").is_none());
        assert!(JsonDecoder.attempt("\"text\"").is_none());
        assert!(JsonDecoder.attempt("42").is_none());
        assert!(JsonDecoder.attempt("null").is_none());
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(JsonDecoder.attempt(r#"{"a": "#).is_none());
        assert!(JsonDecoder.attempt("a=1").is_none());
        assert!(JsonDecoder.attempt("").is_none());
    }

    #[test]
    fn test_empty_object() {
        let map = JsonDecoder.attempt("{}").unwrap();
        assert!(map.is_empty());
    }
}
