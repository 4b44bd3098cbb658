//! XML bodies.
//!
//! The root element becomes the variable map. Child elements and attributes
//! become its keys:
//!
//! ```text
//! <order id="7">                       {
//!   <item>book</item>                    "id": "7",
//!   <item>pen</item>          =>         "item": ["book", "pen"],
//!   <note lang="en">fragile</note>       "note": {"lang": "en", "value": "fragile"}
//! </order>                             }
//! ```
//!
//! An element with only text content is a plain string. Text of an element
//! that also has attributes or children is stored under `value`.

use super::BodyDecoder;
use crate::variables::{Value, VariableMap};
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_document::parser;

/// Key holding the text content of an element that also has structure.
pub const TEXT_KEY: &str = "value";

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl BodyDecoder for XmlDecoder {
    fn name(&self) -> &'static str {
        "XML"
    }

    fn attempt(&self, input: &str) -> Option<VariableMap> {
        let package = parser::parse(input).ok()?;
        let document = package.as_document();
        let root = document.root().children().into_iter().find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })?;

        match element_value(root) {
            Value::Map(map) => Some(map),
            text => {
                let mut map = VariableMap::new();
                map.insert(TEXT_KEY, text);
                Some(map)
            }
        }
    }
}

fn element_value(element: Element<'_>) -> Value {
    let attributes = element.attributes();
    let mut text = String::new();
    let mut children: Vec<(String, Value)> = Vec::new();

    for child in element.children() {
        match child {
            ChildOfElement::Element(e) => {
                children.push((e.name().local_part().to_string(), element_value(e)));
            }
            ChildOfElement::Text(t) => text.push_str(t.text()),
            _ => {}
        }
    }

    if attributes.is_empty() && children.is_empty() {
        return Value::String(text);
    }

    let mut map = VariableMap::new();
    for attribute in attributes {
        map.insert(attribute.name().local_part(), attribute.value());
    }
    for (name, value) in children {
        append_child(&mut map, name, value);
    }
    let text = text.trim();
    if !text.is_empty() {
        map.insert(TEXT_KEY, text);
    }
    Value::Map(map)
}

/// Repeated sibling names collect into a sequence in document order.
fn append_child(map: &mut VariableMap, name: String, value: Value) {
    let merged = match map.get(&name) {
        None => value,
        Some(Value::Sequence(items)) => {
            let mut items = items.clone();
            items.push(value);
            Value::Sequence(items)
        }
        Some(existing) => Value::Sequence(vec![existing.clone(), value]),
    };
    map.insert(name, merged);
}
