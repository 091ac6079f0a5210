// src/types/lenient.rs
//! Field readers for backend records that are only partly typed.
//!
//! Each reader removes the key it interprets from the raw map, so whatever
//! is left over can be kept as pass-through fields.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Record id from `_id` or `id`, `_id` first. Numeric ids are accepted.
pub(crate) fn take_id(fields: &mut Map<String, Value>) -> String {
    let mongo_id = fields.remove("_id").and_then(scalar_text);
    let plain_id = fields.remove("id").and_then(scalar_text);
    mongo_id.or(plain_id).unwrap_or_default()
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Takes `key` only when it holds a string; other values stay in `fields`
pub(crate) fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !fields.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

pub(crate) fn rfc3339(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Takes `key` only when it parses as RFC 3339; anything else stays in
/// `fields` untouched
pub(crate) fn take_timestamp(fields: &mut Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let parsed = fields.get(key).and_then(rfc3339)?;
    fields.remove(key);
    Some(parsed)
}
