// In crates/store/src/lib.rs

use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod error;
pub mod kv;
pub mod snapshot_log;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use kv::{FileStore, MemoryStore};
pub use snapshot_log::SnapshotLog;

/// A string key-value store that survives across sessions.
///
/// Writes are last-write-wins; callers never hold a value across a refresh.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Reads and parses a JSON value stored under `key`.
///
/// A present but unparseable value is reported as `Error::Corrupt`.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| Error::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Serializes `value` as compact JSON and stores it under `key`.
pub fn set_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
