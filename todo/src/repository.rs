//! Durable persistence for the todo list.
//!
//! [`TodoRepository`] maps the three persisted pieces of [`TodoState`] onto
//! keys of a [`KeyValueStore`]:
//!
//! | Key | Value |
//! |---|---|
//! | `<ns>.v1` | JSON array of todo items |
//! | `<ns>.filter.v1` | `all`, `active` or `completed` |
//! | `<ns>.theme.v1` | `dark` or `light` |
//!
//! Loads never fail. Anything missing, unreadable or malformed falls back to
//! the default for that piece and is logged at `warn`.
//!
//! Writes carry the state [`Revision`] that produced them. A write older than
//! the last one that reached a key is dropped, so concurrently running
//! persistence effects can never move the stored copy backwards.

use crate::types::{Filter, Theme, TodoItem, TodoState};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use todolist_core::state::Revision;
use todolist_core::storage::{KeyValueStore, StorageError};
use tokio::sync::Mutex;

/// Default key namespace
pub const DEFAULT_NAMESPACE: &str = "todos";

/// Storage keys for one namespace
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key holding the item collection
    pub items: String,
    /// Key holding the active filter
    pub filter: String,
    /// Key holding the theme
    pub theme: String,
}

impl StorageKeys {
    /// Keys under `namespace`
    ///
    /// ```
    /// use todo::repository::StorageKeys;
    ///
    /// let keys = StorageKeys::for_namespace("todos");
    /// assert_eq!(keys.items, "todos.v1");
    /// assert_eq!(keys.filter, "todos.filter.v1");
    /// assert_eq!(keys.theme, "todos.theme.v1");
    /// ```
    #[must_use]
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            items: format!("{namespace}.v1"),
            filter: format!("{namespace}.filter.v1"),
            theme: format!("{namespace}.theme.v1"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_NAMESPACE)
    }
}

/// Reads and writes todo state through a [`KeyValueStore`]
///
/// Cheap to clone; clones share the backend and the write-ordering guard.
#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn KeyValueStore>,
    keys: Arc<StorageKeys>,
    /// Revision of the last successful write per key.
    written: Arc<Mutex<HashMap<String, Revision>>>,
}

impl std::fmt::Debug for TodoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoRepository")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl TodoRepository {
    /// Creates a repository over `store` using the keys of `namespace`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            store,
            keys: Arc::new(StorageKeys::for_namespace(namespace)),
            written: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Keys this repository reads and writes
    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Persists the whole item collection
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the items cannot be encoded or the backend
    /// rejects the write.
    pub async fn save_items(&self, items: &[TodoItem], revision: Revision) -> Result<(), StorageError> {
        let payload = serde_json::to_string(items)
            .map_err(|e| StorageError::serialization(&self.keys.items, e))?;
        self.write(&self.keys.items, payload, revision).await
    }

    /// Persists the active filter
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    pub async fn save_filter(&self, filter: Filter, revision: Revision) -> Result<(), StorageError> {
        self.write(&self.keys.filter, filter.as_str().to_string(), revision)
            .await
    }

    /// Persists the theme
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    pub async fn save_theme(&self, theme: Theme, revision: Revision) -> Result<(), StorageError> {
        self.write(&self.keys.theme, theme.as_str().to_string(), revision)
            .await
    }

    /// Loads the item collection, or an empty one if absent or unreadable
    pub async fn load_items(&self) -> Vec<TodoItem> {
        let key = &self.keys.items;
        let Some(raw) = self.read(key).await else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<TodoItem>>(&raw) {
            Ok(items) => sanitize(items),
            Err(error) => {
                tracing::warn!(%key, %error, "Discarding malformed todo items");
                Vec::new()
            },
        }
    }

    /// Loads the filter, or [`Filter::All`] if absent or unknown
    pub async fn load_filter(&self) -> Filter {
        let key = &self.keys.filter;
        self.read(key)
            .await
            .and_then(|raw| {
                raw.parse::<Filter>()
                    .map_err(|error| tracing::warn!(%key, %error, "Ignoring stored filter"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Loads the theme, or [`Theme::Dark`] if absent or unknown
    pub async fn load_theme(&self) -> Theme {
        let key = &self.keys.theme;
        self.read(key)
            .await
            .and_then(|raw| {
                raw.parse::<Theme>()
                    .map_err(|error| tracing::warn!(%key, %error, "Ignoring stored theme"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Loads items, filter and theme into a fresh state
    pub async fn load_state(&self) -> TodoState {
        let items = self.load_items().await;
        let filter = self.load_filter().await;
        let theme = self.load_theme().await;

        tracing::debug!(items = items.len(), %filter, %theme, "Loaded todo state");

        let mut state = TodoState::with_items(items);
        state.filter = filter;
        state.theme = theme;
        state
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%key, %error, "Storage read failed, using default");
                None
            },
        }
    }

    async fn write(&self, key: &str, value: String, revision: Revision) -> Result<(), StorageError> {
        // Held across the write so a newer revision cannot land first and
        // then be overwritten.
        let mut written = self.written.lock().await;

        if let Some(&last) = written.get(key) {
            if revision < last {
                tracing::debug!(%key, %revision, %last, "Skipping stale write");
                return Ok(());
            }
        }

        self.store.set(key, value).await?;
        written.insert(key.to_string(), revision);
        tracing::trace!(%key, %revision, "Persisted");
        Ok(())
    }
}

/// Trims text and drops blank items and repeated ids
fn sanitize(items: Vec<TodoItem>) -> Vec<TodoItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter_map(|mut item| {
            let trimmed = item.text.trim();
            if trimmed.is_empty() {
                tracing::warn!(id = %item.id, "Dropping stored todo with blank text");
                return None;
            }
            if !seen.insert(item.id.clone()) {
                tracing::warn!(id = %item.id, "Dropping stored todo with duplicate id");
                return None;
            }
            if trimmed.len() != item.text.len() {
                item.text = trimmed.to_string();
            }
            Some(item)
        })
        .collect()
}
