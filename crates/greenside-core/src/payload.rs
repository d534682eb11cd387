//! Helpers for reading loosely typed upstream payloads.

use serde_json::Value;

/// Renders the payload's `courseID` field as a string.
///
/// Numbers are stringified; a missing field or any other JSON type yields `""`.
pub fn render_course_id(raw: &Value) -> String {
    match raw.get("courseID") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Remaining upstream quota reported in the payload's `apiRequestsLeft` field.
pub fn quota_remaining(raw: &Value) -> Option<String> {
    match raw.get("apiRequestsLeft")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads an integer field, accepting integral floats such as `2.0`.
pub(crate) fn int_field(entry: &Value, field: &str) -> Option<i64> {
    let value = entry.get(field)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
