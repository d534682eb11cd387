//! Conversion between stored cache values and JSON payloads.

use serde_json::Value;

/// Nesting limit for string-encoded JSON written by older clients.
const MAX_STRING_LAYERS: usize = 3;

/// A stored value that is not valid JSON text.
#[derive(Debug, thiserror::Error)]
#[error("Invalid JSON data in cache: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Turns a stored value into the payload it represents.
///
/// Structured values are returned unchanged. A string is parsed as JSON
/// text; if that yields another string (double encoding), it is parsed
/// again, up to a small fixed depth. Only the outermost layer must parse:
/// an inner string that is not JSON is returned as a plain string.
pub fn decode_value(stored: &Value) -> Result<Value, DecodeError> {
    let Value::String(text) = stored else {
        return Ok(stored.clone());
    };

    let mut current: Value = serde_json::from_str(text)?;
    for _ in 1..MAX_STRING_LAYERS {
        let Value::String(inner) = &current else {
            break;
        };
        match serde_json::from_str(inner) {
            Ok(parsed) => current = parsed,
            Err(_) => break,
        }
    }
    Ok(current)
}

/// Produces the text stored for a client-supplied cache value.
///
/// Strings are taken to be serialized JSON already and kept as-is; every
/// other value is serialized. Fetched payloads are not written through this,
/// since a bare string would lose its quotes.
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
