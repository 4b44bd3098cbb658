//! Placeholder substitution for response bodies and headers.
//!
//! # Placeholder Syntax
//!
//! - `$(name)` - Top-level request variable
//! - `$(user.address.city)` - Nested variable, one field per `.`
//! - `$(!RandomInteger)` - Fresh random integer in `[0, 2147483647)`
//!
//! A placeholder ends at the first `)`. Unknown variables render as `null`.
//!
//! # Example
//!
//! ```
//! use mirage_transform::template::substitute;
//! use mirage_transform::variables::VariableMap;
//!
//! let mut variables = VariableMap::new();
//! variables.insert("id", "7");
//!
//! let body = substitute(r#"{"id": "$(id)", "name": "$(name)"}"#, Some(&variables));
//! assert_eq!(body, r#"{"id": "7", "name": "null"}"#);
//! ```

use crate::resolve::resolve;
use crate::response::{HttpHeader, HttpHeaders};
use crate::variables::VariableMap;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Regex for matching placeholders: $(name), $(user.id), $(!RandomInteger)
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\$\(.*?\)").unwrap())
}

/// Text between `$(` and `)` of a matched placeholder.
fn placeholder_body(token: &str) -> &str {
    &token[2..token.len() - 1]
}

/// Substitute every placeholder in `template` using the request variables.
pub fn substitute(template: &str, variables: Option<&VariableMap>) -> String {
    substitute_with(template, |body| resolve(body, variables))
}

/// Substitute every placeholder using a custom resolver.
///
/// The resolver receives the placeholder body and is called once per
/// distinct placeholder text; every occurrence of that text gets the same
/// replacement. Replacements are inserted verbatim and never re-scanned.
pub fn substitute_with<F>(template: &str, mut resolver: F) -> String
where
    F: FnMut(&str) -> String,
{
    let regex = get_placeholder_regex();
    if !regex.is_match(template) {
        return template.to_string();
    }

    let mut resolved: HashMap<&str, String> = HashMap::new();
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for token in regex.find_iter(template) {
        output.push_str(&template[last..token.start()]);
        let replacement = resolved
            .entry(token.as_str())
            .or_insert_with(|| resolver(placeholder_body(token.as_str())));
        output.push_str(replacement);
        last = token.end();
    }
    output.push_str(&template[last..]);

    output
}

/// Substitute placeholders in every value of every header.
///
/// Names, value counts and ordering are preserved; each value is processed
/// independently.
pub fn substitute_headers(headers: &HttpHeaders, variables: Option<&VariableMap>) -> HttpHeaders {
    headers
        .iter()
        .map(|header| HttpHeader {
            name: header.name.clone(),
            values: header
                .values
                .iter()
                .map(|value| substitute(value, variables))
                .collect(),
        })
        .collect()
}

/// Check if a string contains placeholders
pub fn has_placeholders(s: &str) -> bool {
    get_placeholder_regex().is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::Value;

    fn create_test_variables() -> VariableMap {
        let json = serde_json::json!({
            "name": "John",
            "age": 30,
            "user": {"id": "42", "tags": ["a", "b"]},
            "x": "v"
        });
        match Value::from(json) {
            Value::Map(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_substitute_simple() {
        let vars = create_test_variables();
        let result = substitute(r#"{"name": "$(name)"}"#, Some(&vars));
        assert_eq!(result, r#"{"name": "John"}"#);
    }

    #[test]
    fn test_substitute_nested() {
        let vars = create_test_variables();
        let result = substitute("user=$(user.id) age=$(age)", Some(&vars));
        assert_eq!(result, "user=42 age=30");
    }

    #[test]
    fn test_substitute_missing_variable() {
        let vars = create_test_variables();
        let result = substitute(r#"{"missing": "$(user.email)"}"#, Some(&vars));
        assert_eq!(result, r#"{"missing": "null"}"#);
        assert_eq!(substitute("$(name)", None), "null");
    }

    #[test]
    fn test_substitute_sequence_as_json() {
        let vars = create_test_variables();
        assert_eq!(substitute("$(user.tags)", Some(&vars)), r#"["a","b"]"#);
    }

    #[test]
    fn test_substitute_no_placeholders() {
        let vars = create_test_variables();
        let template = "static $ (text) with $name and ${request.path}";
        assert_eq!(substitute(template, Some(&vars)), template);
        assert_eq!(substitute("", Some(&vars)), "");
    }

    #[test]
    fn test_repeated_placeholder_resolved_once() {
        let vars = create_test_variables();
        let mut calls = Vec::new();
        let result = substitute_with("$(x)-$(x)", |body| {
            calls.push(body.to_string());
            resolve(body, Some(&vars))
        });
        assert_eq!(result, "v-v");
        assert_eq!(calls, vec!["x"]);
    }

    #[test]
    fn test_distinct_placeholders_resolved_independently() {
        let mut calls = Vec::new();
        let result = substitute_with("$(a) $(b) $(a) $(c)", |body| {
            calls.push(body.to_string());
            body.to_uppercase()
        });
        assert_eq!(result, "A B A C");
        assert_eq!(calls, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_non_greedy_match() {
        let vars = create_test_variables();
        let result = substitute("($(name)) and ($(x))", Some(&vars));
        assert_eq!(result, "(John) and (v)");
    }

    #[test]
    fn test_placeholder_ends_at_first_paren() {
        let mut bodies = Vec::new();
        substitute_with("$(fn(x)) $()", |body| {
            bodies.push(body.to_string());
            String::new()
        });
        assert_eq!(bodies, vec!["fn(x", ""]);
    }

    #[test]
    fn test_replacement_not_rescanned() {
        let mut vars = VariableMap::new();
        vars.insert("a", "$(b)");
        vars.insert("b", "B");
        assert_eq!(substitute("$(a)", Some(&vars)), "$(b)");
    }

    #[test]
    fn test_random_integer_repeated_text_shares_value() {
        let result = substitute("$(!RandomInteger)/$(!RandomInteger)", None);
        let (first, second) = result.split_once('/').unwrap();
        assert!(first.parse::<u32>().is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn test_substitute_headers() {
        let vars = create_test_variables();
        let mut headers = HttpHeaders::new();
        headers.add("X-User", vec!["$(user.id)", "static", "$(name)-$(age)"]);
        headers.add("Content-Type", vec!["application/json"]);

        let result = substitute_headers(&headers, Some(&vars));
        let collected: Vec<_> = result.iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].name, "X-User");
        assert_eq!(collected[0].values, vec!["42", "static", "John-30"]);
        assert_eq!(collected[1].name, "Content-Type");
        assert_eq!(collected[1].values, vec!["application/json"]);
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("$(a)"));
        assert!(has_placeholders("prefix $(user.id) suffix"));
        assert!(!has_placeholders("no placeholders here"));
        assert!(!has_placeholders("$(unclosed"));
    }
}
