//! Request body decoding.
//!
//! A request body is tried against each supported format in order:
//!
//! 1. JSON object
//! 2. XML document
//! 3. `name=value` pairs joined by `&`
//!
//! The first decoder that understands the input wins. When none does, the
//! query string of the absolute request URL is used as a last resort.
//! Failing every stage is not an error: the request simply carries no
//! variables and every placeholder path renders as `null`.

mod form;
mod json;
mod xml;

pub use form::{decode_form_value, parse_pairs, FormDecoder};
pub use json::JsonDecoder;
pub use xml::XmlDecoder;

use crate::variables::VariableMap;
use tracing::{debug, warn};

/// One stage of the decode fallback chain.
///
/// Decoders hold no per-request state, so a single instance is shared by
/// every concurrent transform.
pub trait BodyDecoder: Send + Sync {
    /// Short format name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Decode the input, or return `None` to let the next stage try.
    fn attempt(&self, input: &str) -> Option<VariableMap>;
}

/// Ordered list of decoders with first-success semantics.
pub struct DecoderChain {
    decoders: Vec<Box<dyn BodyDecoder>>,
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(JsonDecoder),
            Box::new(XmlDecoder),
            Box::new(FormDecoder),
        ])
    }
}

impl std::fmt::Debug for DecoderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.decoders.iter().map(|d| d.name()))
            .finish()
    }
}

impl DecoderChain {
    pub fn new(decoders: Vec<Box<dyn BodyDecoder>>) -> Self {
        Self { decoders }
    }

    /// Decode `input` with the first decoder that accepts it.
    pub fn attempt(&self, input: &str) -> Option<VariableMap> {
        self.decoders.iter().find_map(|decoder| {
            let decoded = decoder.attempt(input);
            if decoded.is_some() {
                debug!("Request input decoded as {}", decoder.name());
            }
            decoded
        })
    }

    /// Decode a request input, falling back to the query string of
    /// `absolute_url` when no decoder accepts the input itself.
    pub fn decode(&self, input: &str, absolute_url: &str) -> Option<VariableMap> {
        if let Some(map) = self.attempt(input) {
            return Some(map);
        }

        if let Some(query) = single_query_string(absolute_url) {
            debug!("Request input decoded from URL query string");
            return Some(parse_pairs(query));
        }

        warn!(
            "Request input doesn't match any of the supported formats ({}, key=value URL query)",
            self.decoders
                .iter()
                .map(|d| d.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        None
    }
}

/// Text after the `?` of a URL that contains exactly one `?` followed by
/// something.
fn single_query_string(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    if query.is_empty() || query.contains('?') {
        return None;
    }
    Some(query)
}
