//! Response definitions handed to and returned from transformers.

use serde::{Deserialize, Serialize};

fn default_status() -> u16 {
    200
}

/// A single response header with all of its values in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeader {
    pub name: String,
    pub values: Vec<String>,
}

impl HttpHeader {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// First value, if any
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Ordered header collection.
///
/// Serialized as a map from name to a single string or a list of strings:
///
/// ```yaml
/// headers:
///   Content-Type: application/json
///   Set-Cookie: ["a=1", "b=2"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders(Vec<HttpHeader>);

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header. Existing headers of the same name are kept.
    pub fn add<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.push(HttpHeader::new(name, values));
    }

    /// Case-insensitive lookup of the first header with this name.
    pub fn get(&self, name: &str) -> Option<&HttpHeader> {
        self.0.iter().find(|h| h.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HttpHeader> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<HttpHeader> for HttpHeaders {
    fn from_iter<T: IntoIterator<Item = HttpHeader>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a HttpHeaders {
    type Item = &'a HttpHeader;
    type IntoIter = std::slice::Iter<'a, HttpHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for HttpHeaders {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for header in &self.0 {
            match header.values.as_slice() {
                [single] => map.serialize_entry(&header.name, single)?,
                values => map.serialize_entry(&header.name, values)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HttpHeaders {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum HeaderValues {
            One(String),
            Many(Vec<String>),
        }

        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = HttpHeaders;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of header names to a string or list of strings")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                let mut headers = HttpHeaders::new();
                while let Some((name, values)) = map.next_entry::<String, HeaderValues>()? {
                    match values {
                        HeaderValues::One(value) => headers.add(name, [value]),
                        HeaderValues::Many(values) => headers.add(name, values),
                    }
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

/// Connection-level faults passed through to the host server untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fault {
    EmptyResponse,
    MalformedResponseChunk,
    RandomDataThenClose,
    ConnectionResetByPeer,
}

/// Response template of a mock rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Inline body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Body file name resolved through a [`crate::files::FileSource`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "HttpHeaders::is_empty")]
    pub headers: HttpHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<Fault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_delay_milliseconds: Option<u64>,
    /// Transformers explicitly enabled for this response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformers: Vec<String>,
    /// Global transformers switched off for this response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_transformers: Vec<String>,
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self {
            status: default_status(),
            status_message: None,
            body: None,
            body_file_name: None,
            headers: HttpHeaders::new(),
            fault: None,
            fixed_delay_milliseconds: None,
            transformers: Vec::new(),
            disabled_transformers: Vec::new(),
        }
    }
}

impl ResponseDefinition {
    /// Response with an inline body
    pub fn with_body(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
            ..Default::default()
        }
    }

    /// Response whose body is loaded from a file
    pub fn with_body_file(status: u16, file_name: impl Into<String>) -> Self {
        Self {
            status,
            body_file_name: Some(file_name.into()),
            ..Default::default()
        }
    }

    pub fn header<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.add(name, values);
        self
    }

    /// True when there is neither an inline body nor a body file.
    pub fn has_empty_body(&self) -> bool {
        self.body.is_none() && self.body_file_name.is_none()
    }
}
