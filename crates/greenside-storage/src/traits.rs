//! The storage contract every cache backend implements.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::CacheEntry;

/// String-keyed store with upsert semantics.
///
/// Implementations must be thread-safe (`Send + Sync`) and own their
/// connection lifecycle; callers share one instance process-wide.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the entry stored under `key`.
    ///
    /// Returns `None` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing keys.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StorageError>;

    /// Inserts or overwrites the serialized JSON text stored under `key`.
    ///
    /// An existing row has both its value and its timestamp replaced.
    async fn put(&self, key: &str, value: &str) -> Result<CacheEntry, StorageError>;

    /// Human-readable backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
