//! Placeholder resolution.

use crate::variables::{Value, VariableMap, NULL_LITERAL};
use rand::Rng;

/// Directive producing a fresh random integer on every resolution.
pub const RANDOM_INTEGER_DIRECTIVE: &str = "!RandomInteger";

/// Exclusive upper bound of generated integers (`i32::MAX`).
pub const RANDOM_INTEGER_BOUND: u32 = i32::MAX as u32;

/// What a placeholder body refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder<'a> {
    RandomInteger,
    Path(&'a str),
}

impl<'a> Placeholder<'a> {
    /// Classify the text between `$(` and `)`.
    pub fn parse(body: &'a str) -> Self {
        if body.contains(RANDOM_INTEGER_DIRECTIVE) {
            Placeholder::RandomInteger
        } else {
            Placeholder::Path(body)
        }
    }
}

/// Resolve a placeholder body against the request variables.
///
/// Always produces text: unknown paths, paths through non-map values and a
/// missing map all render as `null`.
pub fn resolve(body: &str, variables: Option<&VariableMap>) -> String {
    match Placeholder::parse(body) {
        Placeholder::RandomInteger => random_integer().to_string(),
        Placeholder::Path(path) => variables
            .and_then(|map| map.lookup(path))
            .map(Value::render)
            .unwrap_or_else(|| NULL_LITERAL.to_string()),
    }
}

fn random_integer() -> u32 {
    rand::thread_rng().gen_range(0..RANDOM_INTEGER_BOUND)
}
