//! Conversion of transformed responses into hyper responses.

use crate::response::ResponseDefinition;
use bytes::Bytes;
use http_body_util::Full;
use hyper::http::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Response, StatusCode};
use std::str::FromStr;
use tracing::warn;

pub struct ResponseBuilder {
    status: StatusCode,
    body: Option<String>,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn new(status_code: StatusCode) -> Self {
        ResponseBuilder {
            status: status_code,
            body: None,
            headers: Default::default(),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a header value. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_str(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!("Skipping invalid response header '{}: {}'", name, value),
        }
        self
    }

    pub fn build_full(self) -> Response<Full<Bytes>> {
        let payload = self.body.map(Bytes::from).unwrap_or_default();
        let mut response = Response::new(Full::new(payload));

        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl From<&ResponseDefinition> for ResponseBuilder {
    /// Status, headers and inline body of a (transformed) definition.
    ///
    /// An out-of-range status falls back to `500`.
    fn from(definition: &ResponseDefinition) -> Self {
        let status = StatusCode::from_u16(definition.status).unwrap_or_else(|_| {
            warn!("Invalid status code {}, using 500", definition.status);
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let mut builder = ResponseBuilder::new(status);
        for header in &definition.headers {
            for value in &header.values {
                builder = builder.header(&header.name, value);
            }
        }
        match &definition.body {
            Some(body) => builder.body(body.as_str()),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;

    #[test]
    fn test_builder_with_status() {
        let response = ResponseBuilder::new(StatusCode::CREATED).build_full();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_builder_skips_invalid_headers() {
        let response = ResponseBuilder::new(StatusCode::OK)
            .header("X-Valid", "yes")
            .header("bad header", "value")
            .header("X-Bad-Value", "line\nbreak")
            .build_full();

        assert_eq!(response.headers().len(), 1);
        assert_eq!(
            response.headers().get("X-Valid"),
            Some(&HeaderValue::from_static("yes"))
        );
    }

    #[tokio::test]
    async fn test_from_definition() {
        let definition = ResponseDefinition::with_body(201, r#"{"id": "7"}"#)
            .header("Content-Type", ["application/json"])
            .header("Set-Cookie", ["a=1", "b=2"]);

        let response = ResponseBuilder::from(&definition).build_full();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        let cookies: Vec<_> = response.headers().get_all("set-cookie").iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from(r#"{"id": "7"}"#));
    }

    #[test]
    fn test_invalid_status_falls_back() {
        let definition = ResponseDefinition::with_body(1000, "x");
        let response = ResponseBuilder::from(&definition).build_full();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
