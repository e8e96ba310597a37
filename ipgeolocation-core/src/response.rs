//! Normalizes a raw exchange into the JSON object the result types decode.

use log::warn;
use serde_json::{Map, Value};

/// Message carried by the substitute payload for empty or unusable bodies.
pub const FALLBACK_MESSAGE: &str = "Incorrect parameters";

/// Parses `body` into an object and stamps it with `status`.
///
/// An absent, blank or non-object body is replaced by
/// `{"message": "Incorrect parameters"}`. The injected `status` always
/// overrides whatever the body carried.
pub fn normalize(status: u16, body: Option<&str>) -> Map<String, Value> {
    let mut map = match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(body) => parse_object(status, body).unwrap_or_else(fallback),
        None => fallback(),
    };

    map.insert("status".to_string(), Value::String(status.to_string()));
    map
}

fn parse_object(status: u16, body: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            warn!("Expected a JSON object in response (status {status}), got: {}", truncate_body(&other.to_string()));
            None
        }
        Err(err) => {
            warn!("Failed to parse response JSON (status {status}): {err}: {}", truncate_body(body));
            None
        }
    }
}

fn fallback() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("message".to_string(), Value::String(FALLBACK_MESSAGE.to_string()));
    map
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
