//! In-memory key-value store backed by DashMap.
//!
//! Used for single-instance runs and tests. Contents are lost on restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::StorageError;
use crate::traits::KeyValueStore;
use crate::types::CacheEntry;

/// Lock-free in-memory store.
///
/// Cloning is cheap and clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, CacheEntry>>,
    stats: Arc<StoreCounters>,
}

#[derive(Debug, Default)]
struct StoreCounters {
    reads: AtomicU64,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value exactly as given, bypassing the text encoding of [`KeyValueStore::put`].
    ///
    /// Lets tests and migrations reproduce rows written by older clients
    /// (structured values, double-encoded strings, garbage).
    pub fn insert_raw(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let entry = CacheEntry::new(key.clone(), value, OffsetDateTime::now_utc());
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of `get` calls served so far.
    pub fn read_count(&self) -> u64 {
        self.stats.reads.load(Ordering::Relaxed)
    }

    /// Number of `put` calls served so far.
    pub fn write_count(&self) -> u64 {
        self.stats.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        self.stats.reads.fetch_add(1, Ordering::Relaxed);
        let entry = self.entries.get(key).map(|e| e.value().clone());
        tracing::debug!(key = %key, hit = entry.is_some(), "memory store get");
        Ok(entry)
    }

    async fn put(&self, key: &str, value: &str) -> Result<CacheEntry, StorageError> {
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        let entry = CacheEntry::new(
            key,
            Value::String(value.to_string()),
            OffsetDateTime::now_utc(),
        );
        self.entries.insert(key.to_string(), entry.clone());
        tracing::debug!(key = %key, "memory store put");
        Ok(entry)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::new();
        store.put("info_X1", r#"{"courseID":"X1"}"#).await.unwrap();

        let entry = store.get("info_X1").await.unwrap().unwrap();
        assert_eq!(entry.key, "info_X1");
        assert_eq!(entry.value, Value::String(r#"{"courseID":"X1"}"#.into()));
        assert_eq!(store.read_count(), 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get("coordinates_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_value_and_timestamp() {
        let store = InMemoryStore::new();
        let first = store.put("k", "1").await.unwrap();
        let second = store.put("k", "2").await.unwrap();

        let entry = store.get("k").await.unwrap().unwrap();
        assert_eq!(entry.value, Value::String("2".into()));
        assert!(second.inserted_at >= first.inserted_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_raw_keeps_structured_values() {
        let store = InMemoryStore::new();
        store.insert_raw("info_X2", json!({"parsMen": [4]}));

        let entry = store.get("info_X2").await.unwrap().unwrap();
        assert_eq!(entry.value, json!({"parsMen": [4]}));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        clone.put("shared", "{}").await.unwrap();
        assert!(store.contains_key("shared"));
    }
}
