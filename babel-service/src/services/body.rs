//! Loosely-typed field access for JSON request bodies.

use serde_json::Value;

/// Text of `body[key]`, or `None` when the field is falsy.
///
/// Missing keys, non-object bodies, `null`, `false`, `0` and `""` all count
/// as absent. Other scalars are rendered as text (`42` -> "42"); arrays and
/// objects are rendered as compact JSON.
pub fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
