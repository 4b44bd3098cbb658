//! Mock rule configuration.

use crate::error::TransformError;
use crate::files::FileSource;
use crate::request::RequestDescriptor;
use crate::response::ResponseDefinition;
use crate::transformer::{BodyTransformer, ResponseTransformer, TransformerParameters};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub id: String,
    /// Regex matched against the whole request URL; its named groups become
    /// template variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_regex: Option<String>,
    pub response: ResponseDefinition,
}

impl RuleConfig {
    /// Compile the rule's parameters.
    pub fn mount(&self) -> Result<MountedRule, TransformError> {
        Ok(MountedRule {
            id: self.id.clone(),
            parameters: TransformerParameters::from_url_regex(self.url_regex.as_deref())?,
            response: self.response.clone(),
        })
    }
}

/// A rule ready to serve requests. Immutable once mounted.
#[derive(Debug, Clone)]
pub struct MountedRule {
    pub id: String,
    pub parameters: TransformerParameters,
    pub response: ResponseDefinition,
}

impl MountedRule {
    /// Produce the response for `request`, running `transformer` when it
    /// applies to this rule.
    pub fn render(
        &self,
        transformer: &BodyTransformer,
        request: &RequestDescriptor,
        files: &dyn FileSource,
    ) -> Result<ResponseDefinition, TransformError> {
        if !transformer.applies_to(&self.response) {
            debug!("Transformer '{}' disabled for rule '{}'", transformer.name(), self.id);
            return Ok(self.response.clone());
        }
        transformer.transform(request, &self.response, files, &self.parameters)
    }
}
