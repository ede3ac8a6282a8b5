//! Typed values bound to a store key.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use super::{KeyValueStore, SharedStore, StorageError};

/// Errors raised while saving a bound value.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The value could not be serialized.
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store rejected the write.
    #[error("failed to write '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Read and deserialize the JSON value at `key`.
///
/// Returns `None` when the key is absent, unreadable or holds data that does
/// not deserialize as `T`. The last two cases are logged.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed stored value");
            None
        }
    }
}

/// Serialize `value` as JSON and write it at `key`, replacing prior content.
///
/// # Errors
///
/// Returns [`PersistenceError`] if serialization or the store write fails.
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(value).map_err(|source| PersistenceError::Serialize {
        key: key.to_owned(),
        source,
    })?;

    store
        .set_item(key, &raw)
        .map_err(|source| PersistenceError::Storage {
            key: key.to_owned(),
            source,
        })
}

/// An in-memory value kept in sync with a store key.
///
/// Loaded once on construction, then written through to the store after
/// every change made via [`set`](Self::set) or [`update`](Self::update).
/// There is no batching: each change is one write.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use volt_storefront::storage::{MemoryStore, PersistentValue};
///
/// let store = Arc::new(MemoryStore::new());
/// let mut visits = PersistentValue::load_or(store.clone(), "visits", 0_u32);
/// visits.update(|n| *n += 1).unwrap();
///
/// let reloaded = PersistentValue::load_or(store, "visits", 0_u32);
/// assert_eq!(*reloaded.get(), 1);
/// ```
pub struct PersistentValue<T> {
    store: SharedStore,
    key: String,
    value: T,
}

impl<T> PersistentValue<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load the value at `key`, falling back to `fallback` when it is absent
    /// or malformed.
    pub fn load_or(store: SharedStore, key: impl Into<String>, fallback: T) -> Self {
        Self::load_or_else(store, key, || fallback)
    }

    /// Load the value at `key`, calling `fallback` only when it is absent or
    /// malformed.
    pub fn load_or_else(
        store: SharedStore,
        key: impl Into<String>,
        fallback: impl FnOnce() -> T,
    ) -> Self {
        let key = key.into();
        let value = load_json(store.as_ref(), &key).unwrap_or_else(fallback);
        Self { store, key, value }
    }

    /// Store key this value is bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current in-memory value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and write it through.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the write fails. The in-memory value
    /// is replaced either way.
    pub fn set(&mut self, value: T) -> Result<(), PersistenceError> {
        self.value = value;
        self.save()
    }

    /// Replace the value in memory only; the store keeps its current content
    /// until the next write.
    pub fn set_unsaved(&mut self, value: T) {
        self.value = value;
    }

    /// Mutate the value in place and write it through.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the write fails. The mutation stays
    /// applied in memory either way.
    pub fn update<R>(&mut self, change: impl FnOnce(&mut T) -> R) -> Result<R, PersistenceError> {
        let result = change(&mut self.value);
        self.save()?;
        Ok(result)
    }

    /// Write the current value to the store.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if serialization or the write fails.
    pub fn save(&self) -> Result<(), PersistenceError> {
        save_json(self.store.as_ref(), &self.key, &self.value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PersistentValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_absent_key_uses_fallback() {
        let store = Arc::new(MemoryStore::new());
        let value = PersistentValue::load_or(store, "names", vec!["a".to_string()]);
        assert_eq!(value.get(), &vec!["a".to_string()]);
    }

    #[test]
    fn test_present_key_skips_factory() {
        let store = Arc::new(MemoryStore::with_items([("count", "3")]));
        let called = Cell::new(false);
        let value = PersistentValue::load_or_else(store, "count", || {
            called.set(true);
            0_u32
        });
        assert_eq!(*value.get(), 3);
        assert!(!called.get());
    }

    #[test]
    fn test_malformed_value_uses_fallback() {
        let store = Arc::new(MemoryStore::with_items([("count", "{\"not\": \"a number\"}")]));
        let value = PersistentValue::load_or(store.clone(), "count", 7_u32);
        assert_eq!(*value.get(), 7);

        // Malformed content is left untouched until the next write.
        assert_eq!(
            store.get_item("count").unwrap().as_deref(),
            Some("{\"not\": \"a number\"}")
        );
    }

    #[test]
    fn test_set_writes_through() {
        let store = Arc::new(MemoryStore::new());
        let mut value = PersistentValue::load_or(store.clone(), "count", 0_u32);
        value.set(5).unwrap();
        assert_eq!(store.get_item("count").unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn test_update_returns_closure_result() {
        let store = Arc::new(MemoryStore::new());
        let mut value = PersistentValue::load_or(store.clone(), "list", Vec::<u32>::new());
        let len = value
            .update(|list| {
                list.push(9);
                list.len()
            })
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(store.get_item("list").unwrap().as_deref(), Some("[9]"));
    }

    #[test]
    fn test_failed_write_surfaces_error_and_keeps_memory_value() {
        let store = Arc::new(MemoryStore::with_quota(8));
        let mut value = PersistentValue::load_or(store.clone(), "list", Vec::<u32>::new());

        let err = value.set(vec![1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Storage {
                source: StorageError::QuotaExceeded { .. },
                ..
            }
        ));
        assert_eq!(value.get(), &vec![1, 2, 3, 4, 5]);
        assert_eq!(store.get_item("list").unwrap(), None);
    }
}
