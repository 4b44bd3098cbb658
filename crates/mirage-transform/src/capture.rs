//! Named-group captures from the request URL.
//!
//! A rule may configure a regular expression such as
//! `/users/(?<id>\d+)/orders/(?<order>\d+)`. When it matches the whole
//! request URL, every named group is merged into the variable map, so the
//! response can use `$(id)` and `$(order)`. Captured names overwrite values
//! of the same name decoded from the body.
//!
//! Group names are recovered by scanning the pattern text for `(?<name>`
//! rather than asking the regex engine. The i-th declared name is paired
//! with capture group `i + 1`, so patterns are expected to declare their
//! named groups before any unnamed ones.

use crate::error::TransformError;
use crate::variables::{Value, VariableMap};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Regex for finding declared group names: `(?<name>`
static GROUP_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_group_name_regex() -> &'static Regex {
    GROUP_NAME_REGEX.get_or_init(|| Regex::new(r"\(\?<([a-zA-Z][a-zA-Z0-9]*?)>").unwrap())
}

/// Group names declared in a pattern, in declaration order.
pub fn named_group_candidates(pattern: &str) -> Vec<String> {
    get_group_name_regex()
        .captures_iter(pattern)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Compiled URL capture pattern of a single rule.
#[derive(Debug, Clone)]
pub struct UrlCapture {
    pattern: String,
    regex: Regex,
    names: Vec<String>,
}

impl UrlCapture {
    /// Compile a pattern; it must later match the entire URL.
    pub fn compile(pattern: &str) -> Result<Self, TransformError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            TransformError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            names: named_group_candidates(pattern),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Captured `(name, value)` pairs, or `None` when the URL does not match
    /// or the pattern declares more names than it has groups.
    pub fn captures(&self, url: &str) -> Option<Vec<(String, Value)>> {
        let caps = self.regex.captures(url)?;
        let group_count = self.regex.captures_len() - 1;

        if self.names.is_empty() || self.names.len() > group_count {
            debug!(
                "URL pattern '{}' declares {} named groups for {} groups, skipping",
                self.pattern,
                self.names.len(),
                group_count
            );
            return None;
        }

        Some(
            self.names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = caps
                        .get(i + 1)
                        .map(|m| Value::from(m.as_str()))
                        .unwrap_or(Value::Absent);
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    /// Merge captures from `url` into `variables`.
    ///
    /// A URL that doesn't match leaves the map untouched. A match creates the
    /// map when the body produced none.
    pub fn merge(&self, variables: Option<VariableMap>, url: &str) -> Option<VariableMap> {
        let Some(captures) = self.captures(url) else {
            debug!("URL '{}' doesn't match pattern '{}'", url, self.pattern);
            return variables;
        };

        let mut map = variables.unwrap_or_default();
        for (name, value) in captures {
            map.insert(name, value);
        }
        Some(map)
    }
}
