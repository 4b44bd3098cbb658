//! Error types for response transformation.

/// Errors that abort a transform or reject a rule configuration.
///
/// Everything else (undecodable bodies, URL patterns that do not match,
/// badly encoded form values) degrades gracefully and is only logged.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to read body file '{name}': {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid URL capture pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
