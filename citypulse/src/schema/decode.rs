//! One normalization step for structured `content`: whether the service returned a parsed
//! structure or its JSON encoding as a string, callers get the same [`LocalInfo`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::LocalInfo;
use crate::error::ContentError;

/// Decodes a structured response `content` into [`LocalInfo`].
///
/// A string is parsed as JSON first. Reasoning models may prefix a `<think>...</think>` block and
/// some replies wrap the JSON in a Markdown code fence; both are stripped before parsing.
///
/// Items are decoded one at a time: an item that does not fit its category is skipped with a
/// warning and its siblings are kept.
pub fn decode_local_info(content: &Value) -> Result<LocalInfo, ContentError> {
    match content {
        Value::String(text) => {
            let body = strip_wrappers(text);
            if body.is_empty() {
                return Err(ContentError::Empty);
            }
            let value: Value = serde_json::from_str(body).map_err(ContentError::InvalidJson)?;
            decode_value(value)
        }
        other => decode_value(other.clone()),
    }
}

fn decode_value(value: Value) -> Result<LocalInfo, ContentError> {
    let mut map = match value {
        Value::Object(map) => map,
        other => return Err(ContentError::NotAnObject(json_type_name(&other))),
    };
    Ok(LocalInfo {
        events: decode_items(map.remove("events"), "events")?,
        restaurants: decode_items(map.remove("restaurants"), "restaurants")?,
        alerts: decode_items(map.remove("alerts"), "alerts")?,
    })
}

/// A missing or null category is empty; a category that is not a list is a schema error.
fn decode_items<T: DeserializeOwned>(
    raw: Option<Value>,
    category: &'static str,
) -> Result<Vec<T>, ContentError> {
    let elements: Vec<Value> = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => serde_json::from_value(v).map_err(ContentError::Schema)?,
    };
    let mut items = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(item) => items.push(item),
            Err(e) => warn!(category, index, error = %e, "skipping malformed item"),
        }
    }
    Ok(items)
}

fn strip_wrappers(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(end) = body.find("</think>") {
        if body.starts_with("<think>") {
            body = body[end + "</think>".len()..].trim();
        }
    }
    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.strip_suffix("```").unwrap_or(rest).trim();
    }
    body
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
