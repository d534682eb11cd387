//! # greenside-storage
//!
//! Key-value storage abstraction for the Greenside gateway cache.
//!
//! The main trait is [`KeyValueStore`], a string-keyed upsert store holding
//! the raw upstream payloads. Backends live in separate crates, except for
//! [`InMemoryStore`] which is used for local runs and tests.
//!
//! ## Value encoding
//!
//! Rows hold text. Fetched payloads are stored as serialized JSON, while
//! client writes go through [`encode_value`], which keeps strings verbatim.
//! Older writers stored structured values or double-encoded strings, so
//! readers go through [`decode_value`], which accepts all of these forms.
//!
//! ## Example
//!
//! ```ignore
//! use greenside_storage::{KeyValueStore, decode_value};
//!
//! async fn cached(store: &dyn KeyValueStore, key: &str) -> Option<serde_json::Value> {
//!     let entry = store.get(key).await.ok()??;
//!     decode_value(&entry.value).ok()
//! }
//! ```

mod codec;
mod error;
mod memory;
mod traits;
mod types;

pub use codec::{DecodeError, decode_value, encode_value};
pub use error::{ErrorCategory, StorageError};
pub use memory::InMemoryStore;
pub use traits::KeyValueStore;
pub use types::CacheEntry;
