//! Request variable extraction and placeholder substitution for mock HTTP
//! responses.
//!
//! A mock rule's response may contain `$(...)` placeholders in its body and
//! header values. [`BodyTransformer`] fills them from the incoming request:
//!
//! - the request body (or query string for `GET`) decoded as JSON, XML or
//!   `key=value` pairs ([`decode`])
//! - named groups of the rule's URL regex ([`capture`])
//! - `$(!RandomInteger)` for a fresh random number ([`resolve`])
//!
//! # Example
//!
//! ```
//! use mirage_transform::{
//!     BodyTransformer, DirectoryFileSource, RequestDescriptor, ResponseDefinition,
//!     ResponseTransformer, TransformerParameters,
//! };
//!
//! let transformer = BodyTransformer::new();
//! let parameters = TransformerParameters::with_url_regex(r"/users/(?<id>\d+)").unwrap();
//! let request = RequestDescriptor::new("POST", "/users/7")
//!     .with_body(r#"{"user": {"name": "Alice"}}"#);
//! let response = ResponseDefinition::with_body(200, "$(id): $(user.name)")
//!     .header("X-User", ["$(id)"]);
//!
//! let rendered = transformer
//!     .transform(&request, &response, &DirectoryFileSource::new("__files"), &parameters)
//!     .unwrap();
//! assert_eq!(rendered.body.as_deref(), Some("7: Alice"));
//! ```

pub mod capture;
pub mod config;
pub mod decode;
pub mod error;
pub mod files;
pub mod http;
pub mod request;
pub mod resolve;
pub mod response;
pub mod template;
pub mod transformer;
pub mod variables;

pub use error::TransformError;
pub use files::{DirectoryFileSource, FileSource};
pub use request::RequestDescriptor;
pub use response::{Fault, HttpHeader, HttpHeaders, ResponseDefinition};
pub use transformer::{
    BodyTransformer, ResponseTransformer, TransformerParameters, BODY_TRANSFORMER_NAME,
};
pub use variables::{Value, VariableMap};
