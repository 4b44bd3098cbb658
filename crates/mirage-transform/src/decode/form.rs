//! `name=value&name=value` bodies and query strings.

use super::BodyDecoder;
use crate::variables::VariableMap;
use tracing::warn;

/// Accepts any non-empty input that contains `&` or `=`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDecoder;

impl BodyDecoder for FormDecoder {
    fn name(&self) -> &'static str {
        "key=value"
    }

    fn attempt(&self, input: &str) -> Option<VariableMap> {
        if input.is_empty() || !(input.contains('&') || input.contains('=')) {
            return None;
        }
        Some(parse_pairs(input))
    }
}

/// Parse `&`-separated pairs, splitting each on its first `=`.
///
/// A pair without `=` and a pair with nothing after `=` both produce an
/// empty value. Later duplicates overwrite earlier ones.
pub fn parse_pairs(input: &str) -> VariableMap {
    let mut map = VariableMap::new();
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((name, value)) => map.insert(name, decode_form_value(name, value)),
            None => map.insert(pair, ""),
        };
    }
    map
}

/// Decode a form-encoded value (`+` is a space, `%XX` escapes are UTF-8).
///
/// A value with a malformed escape (`%ZZ`, a truncated `%4`) or with escapes
/// that do not form valid UTF-8 becomes an empty string.
pub fn decode_form_value(name: &str, raw: &str) -> String {
    if let Some(offset) = malformed_escape(raw) {
        warn!(
            "Can't decode request parameter '{}': malformed escape at offset {}",
            name, offset
        );
        return String::new();
    }

    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!(
                "Can't decode request parameter '{}', it should be UTF-8: {}",
                name, e
            );
            String::new()
        }
    }
}

/// Byte offset of the first `%` not followed by two hex digits.
fn malformed_escape(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => i += 3,
                _ => return Some(i),
            }
        } else {
            i += 1;
        }
    }
    None
}
