//! Request descriptor seen by transformers.

use crate::response::HttpHeaders;

/// Incoming request as handed over by the host server.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    pub method: String,
    /// Path and query, e.g. `/users/7?verbose=true`
    pub url: String,
    /// Scheme, authority, path and query
    pub absolute_url: String,
    pub body: String,
    pub headers: HttpHeaders,
}

impl RequestDescriptor {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            absolute_url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_absolute_url(mut self, absolute_url: impl Into<String>) -> Self {
        self.absolute_url = absolute_url.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, [value.into()]);
        self
    }

    /// Create from hyper request parts
    ///
    /// `host` is used to build the absolute URL when the request URI is in
    /// origin form (`/path?query`), which is what servers normally receive.
    pub fn from_parts(
        method: &hyper::Method,
        uri: &hyper::Uri,
        headers: &hyper::HeaderMap,
        body: Option<&str>,
        host: &str,
    ) -> Self {
        let url = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        let absolute_url = if uri.scheme().is_some() {
            uri.to_string()
        } else {
            format!("http://{}{}", host.trim_end_matches('/'), url)
        };

        let mut header_list = HttpHeaders::new();
        for name in headers.keys() {
            let values: Vec<String> = headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok().map(str::to_string))
                .collect();
            if !values.is_empty() {
                header_list.add(name.as_str(), values);
            }
        }

        Self {
            method: method.as_str().to_string(),
            url,
            absolute_url,
            body: body.unwrap_or("").to_string(),
            headers: header_list,
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Query string of the relative URL (after the last `?`), empty when
    /// there is none.
    pub fn query_string(&self) -> &str {
        self.url
            .rsplit_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }

    /// Text handed to the body decoders: the query string for `GET`, the raw
    /// body for every other method.
    pub fn decode_input(&self) -> &str {
        if self.is_get() {
            self.query_string()
        } else {
            &self.body
        }
    }
}
