//! Durable key-value storage abstraction.
//!
//! This module defines the substrate that application state is persisted to
//! so that it survives process restarts: string keys, string values, last
//! write wins. There are no transactions and no subscriptions.
//!
//! # Implementations
//!
//! - `FileKeyValueStore` (in the `todo` crate): one file per key on disk
//! - `InMemoryKeyValueStore` (in `todolist-testing`): `HashMap`-backed, with
//!   write recording and fault injection for tests
//!
//! # Example
//!
//! ```no_run
//! use todolist_core::storage::{KeyValueStore, StorageError};
//!
//! async fn example(store: &dyn KeyValueStore) -> Result<(), StorageError> {
//!     store.set("todos.theme.v1", "light".to_string()).await?;
//!     let theme = store.get("todos.theme.v1").await?;
//!     assert_eq!(theme.as_deref(), Some("light"));
//!     Ok(())
//! }
//! ```

use futures::future::BoxFuture;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("I/O error on key {key}: {message}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error description.
        message: String,
    },

    /// A value could not be encoded or decoded.
    #[error("Serialization error on key {key}: {message}")]
    Serialization {
        /// Key being accessed.
        key: String,
        /// Underlying error description.
        message: String,
    },
}

impl StorageError {
    /// Builds an [`StorageError::Io`] for `key` from any displayable error.
    pub fn io(key: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Io {
            key: key.into(),
            message: error.to_string(),
        }
    }

    /// Builds a [`StorageError::Serialization`] for `key` from any displayable error.
    pub fn serialization(key: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Serialization {
            key: key.into(),
            message: error.to_string(),
        }
    }
}

/// Result type for storage futures.
pub type StorageFuture<'a, T> = BoxFuture<'a, Result<T, StorageError>>;

/// Durable key-value store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: effects capture an
/// `Arc<dyn KeyValueStore>` and run on spawned tasks.
///
/// # Dyn Compatibility
///
/// This trait uses explicit boxed future returns instead of `async fn`
/// to enable trait object usage (`Arc<dyn KeyValueStore>`).
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the medium cannot be read.
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the medium cannot be written.
    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()>;
}
