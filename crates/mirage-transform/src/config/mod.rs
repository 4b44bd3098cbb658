//! Configuration types for Mirage.

mod rules;

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use rules::{MountedRule, RuleConfig};

/// A set of mock rules.
///
/// ```yaml
/// rules:
///   - id: get-user
///     urlRegex: "/users/(?<id>\\d+)"
///     response:
///       status: 200
///       headers:
///         Content-Type: application/json
///       body: '{"id": "$(id)", "requestId": "$(!RandomInteger)"}'
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MockConfig {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl MockConfig {
    /// Load from YAML, or JSON when the file extension is `.json`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: MockConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                anyhow::bail!("Rule id must not be empty");
            }
            if !seen.insert(rule.id.as_str()) {
                anyhow::bail!("Duplicate rule id: '{}'", rule.id);
            }
            rule.mount()
                .with_context(|| format!("Invalid rule '{}'", rule.id))?;
        }
        Ok(())
    }

    /// Compile every rule.
    pub fn mount(&self) -> Result<Vec<MountedRule>, anyhow::Error> {
        self.rules
            .iter()
            .map(|rule| {
                rule.mount()
                    .with_context(|| format!("Invalid rule '{}'", rule.id))
            })
            .collect()
    }

    pub fn rule(&self, id: &str) -> Option<&RuleConfig> {
        self.rules.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::DirectoryFileSource;
    use crate::request::RequestDescriptor;
    use crate::transformer::BodyTransformer;

    const YAML: &str = r#"
rules:
  - id: get-user
    urlRegex: "/users/(?<id>\\d+)"
    response:
      status: 200
      headers:
        Content-Type: application/json
        X-User-Id: "$(id)"
      body: '{"id": "$(id)", "name": "$(name)"}'
  - id: static
    response:
      body: "$(id)"
      disabledTransformers: [body-transformer]
"#;

    #[test]
    fn test_parse_yaml() {
        let config: MockConfig = serde_yaml::from_str(YAML).unwrap();
        config.validate().unwrap();
        assert_eq!(config.rules.len(), 2);
        assert_eq!(
            config.rule("get-user").unwrap().url_regex.as_deref(),
            Some(r"/users/(?<id>\d+)")
        );
        assert!(config.rule("static").unwrap().url_regex.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let yaml = r#"
rules:
  - id: broken
    urlRegex: "/users/(?<id>\\d+"
    response:
      body: x
"#;
        let config: MockConfig = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let yaml = r#"
rules:
  - id: a
    response: {body: x}
  - id: a
    response: {body: y}
"#;
        let config: MockConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("Duplicate"));
    }

    #[test]
    fn test_mounted_rules_render() {
        let config: MockConfig = serde_yaml::from_str(YAML).unwrap();
        let rules = config.mount().unwrap();
        let transformer = BodyTransformer::new();
        let files = DirectoryFileSource::new(".");

        let request = RequestDescriptor::new("POST", "/users/7").with_body("name=Ann");
        let rendered = rules[0].render(&transformer, &request, &files).unwrap();
        assert_eq!(rendered.body.as_deref(), Some(r#"{"id": "7", "name": "Ann"}"#));
        assert_eq!(rendered.headers.get("X-User-Id").unwrap().values, vec!["7"]);

        let untouched = rules[1].render(&transformer, &request, &files).unwrap();
        assert_eq!(untouched.body.as_deref(), Some("$(id)"));
    }

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{"rules": [{"id": "r", "response": {"status": 204}}]}"#,
        )
        .unwrap();

        let config = MockConfig::from_file(&path).unwrap();
        assert_eq!(config.rules[0].response.status, 204);
    }

    #[test]
    fn test_from_file_missing() {
        let err = MockConfig::from_file("/nonexistent/rules.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
