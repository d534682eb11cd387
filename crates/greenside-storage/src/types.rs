//! Types stored in and returned by the key-value cache.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A single cache row.
///
/// `value` is whatever the backend holds: a [`Value::String`] with serialized
/// JSON text for rows written by this crate, or a structured value for rows
/// from older writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, value: Value, inserted_at: OffsetDateTime) -> Self {
        Self {
            key: key.into(),
            value,
            inserted_at,
        }
    }
}
