//! Normalisation of backend response bodies
//!
//! The backend is inconsistent about envelopes: a list may arrive as
//! `{"data": {"data": [..]}}`, `{"data": [..]}` or a bare `[..]`, and ids may
//! be strings or numbers. Everything is unwrapped here, once, so the resolver
//! only ever sees [`LocationNode`]s.

use crate::error::SourceError;
use crate::level::LocationLevel;
use crate::node::{LocationId, LocationNode};
use serde_json::Value;

/// Extract the list from a response body, empty when there is none
#[must_use]
pub fn unwrap_list_response(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        Value::Object(mut map) => map
            .remove("data")
            .map(unwrap_list_response)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Extract the single object from a response body
#[must_use]
pub fn unwrap_item_response(raw: Value) -> Option<Value> {
    match raw {
        Value::Object(mut map) => {
            if matches!(map.get("data"), Some(Value::Object(_))) {
                map.remove("data").and_then(unwrap_item_response)
            } else {
                Some(Value::Object(map))
            }
        }
        _ => None,
    }
}

/// Read an identifier written as a string or a number
fn id_from_value(value: Option<&Value>) -> Option<LocationId> {
    match value? {
        Value::String(s) => LocationId::parse(s),
        Value::Number(n) => Some(LocationId::new(n.to_string())),
        _ => None,
    }
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode one node of `level`
///
/// # Errors
/// [`SourceError::Decode`] when the value is not an object or lacks an id or name.
pub fn decode_node(level: LocationLevel, value: &Value) -> Result<LocationNode, SourceError> {
    let object = value
        .as_object()
        .ok_or_else(|| SourceError::decode(level, "expected an object"))?;

    let id = id_from_value(object.get("id"))
        .ok_or_else(|| SourceError::decode(level, "missing id"))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| SourceError::decode(level, format!("missing name for '{id}'")))?
        .trim()
        .to_string();

    let parent = level.parent_key().and_then(|key| {
        id_from_value(object.get(key)).or_else(|| id_from_value(object.get(&snake_case(key))))
    });

    Ok(LocationNode {
        level,
        id,
        name,
        parent,
    })
}

/// Decode a list of nodes, skipping entries that do not decode
#[must_use]
pub fn decode_nodes(level: LocationLevel, raw: Value) -> Vec<LocationNode> {
    unwrap_list_response(raw)
        .iter()
        .filter_map(|value| match decode_node(level, value) {
            Ok(node) => Some(node),
            Err(error) => {
                tracing::warn!(%level, %error, "skipping malformed location entry");
                None
            }
        })
        .collect()
}
