//! Variable map extracted from a request.
//!
//! Request bodies arrive in arbitrary JSON, XML or form shapes. They are all
//! normalised into [`VariableMap`], a nested map of [`Value`]s, so that a
//! placeholder such as `$(user.address.city)` resolves the same way whatever
//! format the client sent.

use serde::Serialize;
use std::collections::HashMap;

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text, including JSON numbers and booleans in their JSON spelling
    String(String),
    /// Nested object or XML element
    Map(VariableMap),
    /// JSON array or repeated XML element
    Sequence(Vec<Value>),
    /// JSON `null`, or a capture group that did not participate
    Absent,
}

impl Value {
    /// Text written into a template for this value.
    pub fn render(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Absent => NULL_LITERAL.to_string(),
            Value::Map(_) | Value::Sequence(_) => {
                serde_json::to_string(self).unwrap_or_else(|_| NULL_LITERAL.to_string())
            }
        }
    }

    pub fn as_map(&self) -> Option<&VariableMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<VariableMap> for Value {
    fn from(map: VariableMap) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(b) => Value::String(b.to_string()),
            serde_json::Value::Number(n) => Value::String(n.to_string()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Rendering of a placeholder that has no value.
pub const NULL_LITERAL: &str = "null";

/// String-keyed map of extracted values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableMap(HashMap<String, Value>);

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Follow a dotted path (e.g. `user.address.city`) through nested maps.
    ///
    /// Returns `None` when a field is missing or when a field other than the
    /// last one holds something that is not a map.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut fields = path.split('.');
        let first = fields.next()?;
        let mut current = self.get(first)?;
        for field in fields {
            current = current.as_map()?.get(field)?;
        }
        Some(current)
    }
}

impl FromIterator<(String, Value)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for VariableMap {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VariableMap {
        let json = serde_json::json!({
            "user": {"id": "42", "address": {"city": "Oslo"}},
            "count": 3,
            "active": true,
            "tags": ["a", "b"],
            "nothing": null
        });
        match Value::from(json) {
            Value::Map(map) => map,
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_nested() {
        let map = sample();
        assert_eq!(map.lookup("user.id"), Some(&Value::from("42")));
        assert_eq!(map.lookup("user.address.city"), Some(&Value::from("Oslo")));
    }

    #[test]
    fn test_lookup_missing() {
        let map = sample();
        assert_eq!(map.lookup("user.name"), None);
        assert_eq!(map.lookup("missing"), None);
        assert_eq!(map.lookup("User.id"), None);
    }

    #[test]
    fn test_lookup_through_non_map_is_not_found() {
        let map = sample();
        assert_eq!(map.lookup("user.id.more"), None);
        assert_eq!(map.lookup("tags.0"), None);
    }

    #[test]
    fn test_json_scalars_become_text() {
        let map = sample();
        assert_eq!(map.lookup("count"), Some(&Value::from("3")));
        assert_eq!(map.lookup("active"), Some(&Value::from("true")));
        assert_eq!(map.lookup("nothing"), Some(&Value::Absent));
    }

    #[test]
    fn test_render() {
        let map = sample();
        assert_eq!(map.lookup("nothing").map(Value::render), Some("null".into()));
        assert_eq!(map.lookup("tags").map(Value::render), Some(r#"["a","b"]"#.into()));
        assert_eq!(
            map.lookup("user.address").map(Value::render),
            Some(r#"{"city":"Oslo"}"#.into())
        );
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = VariableMap::new();
        assert!(map.insert("id", "1").is_none());
        assert_eq!(map.insert("id", "2"), Some(Value::from("1")));
        assert_eq!(map.get("id"), Some(&Value::from("2")));
        assert_eq!(map.len(), 1);
    }
}
