//! In-memory durable storage for tests
//!
//! [`InMemoryKeyValueStore`] is a `HashMap`-backed [`KeyValueStore`] that
//! also records every write, so tests can assert both on what is stored and
//! on whether a write happened at all. It can be seeded with arbitrary
//! (including corrupt) payloads and told to fail reads or writes.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use todolist_core::storage::{KeyValueStore, StorageError, StorageFuture};

#[derive(Debug, Default)]
struct Inner {
    data: HashMap<String, String>,
    writes: Vec<(String, String)>,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory key-value store for fast, deterministic testing.
///
/// Clones share the same underlying map.
///
/// # Example
///
/// ```
/// use todolist_testing::InMemoryKeyValueStore;
/// use todolist_core::storage::KeyValueStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryKeyValueStore::new().with_value("todos.v1", "not json");
///
/// store.set("todos.theme.v1", "light".to_string()).await?;
///
/// assert_eq!(store.value("todos.v1").as_deref(), Some("not json"));
/// assert_eq!(store.write_count("todos.theme.v1"), 1);
/// assert_eq!(store.write_count("todos.v1"), 0); // seeding is not a write
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording a write
    #[must_use]
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.lock().unwrap().data.insert(key.into(), value.into());
        self
    }

    /// Current value under `key`
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().data.get(key).cloned()
    }

    /// Number of successful writes to `key`
    #[must_use]
    pub fn write_count(&self, key: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .writes
            .iter()
            .filter(|(k, _)| k == key)
            .count()
    }

    /// Number of successful writes to any key
    #[must_use]
    pub fn total_writes(&self) -> usize {
        self.inner.lock().unwrap().writes.len()
    }

    /// Every successful write, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Make subsequent reads fail with [`StorageError::Io`]
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_reads = fail;
    }

    /// Make subsequent writes fail with [`StorageError::Io`]
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            let inner = self.inner.lock().unwrap();
            if inner.fail_reads {
                return Err(StorageError::io(key, "injected read failure"));
            }
            Ok(inner.data.get(key).cloned())
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_writes {
                return Err(StorageError::io(key, "injected write failure"));
            }
            inner.writes.push((key.to_string(), value.clone()));
            inner.data.insert(key.to_string(), value);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "v".to_string()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.writes(), vec![("k".to_string(), "v".to_string())]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryKeyValueStore::new().with_value("k", "v");
        store.fail_reads(true);
        store.fail_writes(true);

        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "w".to_string()).await.is_err());
        assert_eq!(store.total_writes(), 0);

        store.fail_reads(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        other.set("k", "v".to_string()).await.unwrap();

        assert_eq!(store.value("k").as_deref(), Some("v"));
        assert_eq!(store.write_count("k"), 1);
    }
}
