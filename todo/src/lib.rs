//! Persistent todo list built on the todolist reducer architecture.
//!
//! Items can be added, edited, completed, deleted and filtered. The item
//! collection, the active filter and the color theme survive restarts
//! through a [`KeyValueStore`](todolist_core::storage::KeyValueStore).
//!
//! - [`types`]: items, filter, theme, state and actions
//! - [`reducer`]: the business rules, one arm per command
//! - [`repository`]: the durable-store contract and load hygiene
//! - [`file_store`]: one-file-per-key storage on disk
//! - [`view`] and [`command`]: the terminal front end
//! - [`config`]: environment-driven settings
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo::{open_store, FileKeyValueStore, TodoAction, TodoEnvironment};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::production(Arc::new(FileKeyValueStore::new("/tmp/todo")), "todos");
//! let store = open_store(env).await;
//!
//! // Add a todo and wait until it is on disk
//! store
//!     .send(TodoAction::Add { text: "Buy milk".to_string() })
//!     .await?
//!     .wait()
//!     .await;
//!
//! let counts = store.state(|s| s.counts()).await;
//! println!("{} remaining of {}", counts.remaining, counts.total);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod file_store;
pub mod reducer;
pub mod repository;
pub mod types;
pub mod view;

use todolist_runtime::Store;

// Re-export commonly used types
pub use file_store::FileKeyValueStore;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use repository::TodoRepository;
pub use types::{Counts, Filter, PersistFailure, Theme, TodoAction, TodoId, TodoItem, TodoState};

/// Store running the todo reducer
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Loads persisted state through the environment's repository and starts a
/// store on it
pub async fn open_store(environment: TodoEnvironment) -> TodoStore {
    let state = environment.repository.load_state().await;
    Store::new(state, TodoReducer::new(), environment)
}
