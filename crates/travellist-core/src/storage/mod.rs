//! Key-value storage tiers.
//!
//! All persistent state lives behind the [`KeyValueStore`] trait, so the
//! durable and ephemeral tiers can be swapped for in-memory fakes:
//!
//! - [`FileStore`]: durable tier, one JSON file per key
//! - [`MemoryStore`]: ephemeral tier, gone when the process exits
//!
//! Values are JSON text. [`read_json`] treats a missing key as `None` and a
//! malformed value as [`StorageError::Corrupt`].

pub mod error;
pub mod file;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Credential collection, durable tier only.
pub const USERS_KEY: &str = "travellist_users";

/// Session payload, present in at most one tier under correct operation.
pub const SESSION_KEY: &str = "travellist_user";

/// Key holding the destination list owned by `user_id`.
pub fn destinations_key(user_id: &str) -> String {
    format!("destinations_{}", user_id)
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A flat string-to-string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Read and decode a JSON value.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(contents) = store.get(key)? else {
        return Ok(None);
    };

    let value = serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    debug!(key, bytes = contents.len(), "Read stored value");
    Ok(Some(value))
}

/// Encode a value as JSON and write it, replacing whatever was there.
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let contents = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &contents)?;
    debug!(key, bytes = contents.len(), "Wrote stored value");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destinations_key_is_partitioned_by_user() {
        assert_eq!(destinations_key("abc"), "destinations_abc");
        assert_ne!(destinations_key("a"), destinations_key("b"));
    }

    #[test]
    fn test_read_json_missing_key_is_none() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = read_json(&store, "nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_malformed_is_corrupt() {
        let store = MemoryStore::new();
        store.set(USERS_KEY, "{not json").unwrap();
        let result: Result<Option<Vec<String>>> = read_json(&store, USERS_KEY);
        assert!(matches!(result, Err(StorageError::Corrupt { ref key, .. }) if key == USERS_KEY));
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, "list", &vec![1, 2, 3]).unwrap();
        let value: Option<Vec<i32>> = read_json(&store, "list").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }
}
