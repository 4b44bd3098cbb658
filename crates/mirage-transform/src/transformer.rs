//! Response transformers.
//!
//! [`BodyTransformer`] extracts variables from the request, then substitutes
//! `$(...)` placeholders in the response body and in every header value:
//!
//! 1. Decode the request (query string for `GET`, body otherwise) as JSON,
//!    XML or `key=value` pairs, falling back to the absolute URL's query.
//! 2. Merge named groups of the rule's URL pattern, if one is configured.
//! 3. Load the body (inline, or from the body file) and substitute.

use crate::capture::UrlCapture;
use crate::decode::DecoderChain;
use crate::error::TransformError;
use crate::files::FileSource;
use crate::request::RequestDescriptor;
use crate::response::ResponseDefinition;
use crate::template::{substitute, substitute_headers};
use crate::variables::VariableMap;
use tracing::debug;

/// Name under which [`BodyTransformer`] is registered.
pub const BODY_TRANSFORMER_NAME: &str = "body-transformer";

/// Per-rule transformer configuration, compiled once when the rule is
/// mounted.
#[derive(Debug, Clone, Default)]
pub struct TransformerParameters {
    url_capture: Option<UrlCapture>,
}

impl TransformerParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters with a URL capture pattern (the `urlRegex` rule setting).
    pub fn with_url_regex(pattern: &str) -> Result<Self, TransformError> {
        Ok(Self {
            url_capture: Some(UrlCapture::compile(pattern)?),
        })
    }

    /// Compile an optional `urlRegex` setting.
    pub fn from_url_regex(pattern: Option<&str>) -> Result<Self, TransformError> {
        match pattern {
            Some(pattern) => Self::with_url_regex(pattern),
            None => Ok(Self::new()),
        }
    }

    pub fn url_capture(&self) -> Option<&UrlCapture> {
        self.url_capture.as_ref()
    }
}

/// A transformation the host server applies to a matched response.
pub trait ResponseTransformer: Send + Sync {
    /// Stable identifier used in `transformers` / `disabledTransformers`.
    fn name(&self) -> &str;

    /// Whether the transformer runs for every rule without being listed.
    fn apply_globally(&self) -> bool;

    /// Whether this transformer should run for `response`.
    fn applies_to(&self, response: &ResponseDefinition) -> bool {
        let name = self.name();
        if response.disabled_transformers.iter().any(|t| t == name) {
            return false;
        }
        self.apply_globally() || response.transformers.iter().any(|t| t == name)
    }

    fn transform(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDefinition,
        files: &dyn FileSource,
        parameters: &TransformerParameters,
    ) -> Result<ResponseDefinition, TransformError>;
}

/// Placeholder substitution driven by request variables.
///
/// Holds only immutable decoders, so one instance can serve concurrent
/// requests.
#[derive(Debug, Default)]
pub struct BodyTransformer {
    decoders: DecoderChain,
}

impl BodyTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decoders(decoders: DecoderChain) -> Self {
        Self { decoders }
    }

    /// Build the variable map for a request: decoded input plus URL captures.
    pub fn extract_variables(
        &self,
        request: &RequestDescriptor,
        parameters: &TransformerParameters,
    ) -> Option<VariableMap> {
        let variables = self
            .decoders
            .decode(request.decode_input(), &request.absolute_url);

        match parameters.url_capture() {
            Some(capture) => capture.merge(variables, &request.url),
            None => variables,
        }
    }
}

impl ResponseTransformer for BodyTransformer {
    fn name(&self) -> &str {
        BODY_TRANSFORMER_NAME
    }

    fn apply_globally(&self) -> bool {
        true
    }

    fn transform(
        &self,
        request: &RequestDescriptor,
        response: &ResponseDefinition,
        files: &dyn FileSource,
        parameters: &TransformerParameters,
    ) -> Result<ResponseDefinition, TransformError> {
        if response.has_empty_body() {
            debug!("Response has no body to transform");
            return Ok(response.clone());
        }

        let body = response_body(response, files)?;
        let variables = self.extract_variables(request, parameters);

        debug!(
            "Transforming response for {} {} with {} variables",
            request.method,
            request.url,
            variables.as_ref().map_or(0, VariableMap::len)
        );

        Ok(ResponseDefinition {
            body: Some(substitute(&body, variables.as_ref())),
            body_file_name: None,
            headers: substitute_headers(&response.headers, variables.as_ref()),
            ..response.clone()
        })
    }
}

/// Inline body if present, otherwise the contents of the body file.
fn response_body(
    response: &ResponseDefinition,
    files: &dyn FileSource,
) -> Result<String, TransformError> {
    if let Some(body) = &response.body {
        return Ok(body.clone());
    }
    match &response.body_file_name {
        Some(name) => {
            let bytes = files.binary_file_named(name)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        None => Ok(String::new()),
    }
}
