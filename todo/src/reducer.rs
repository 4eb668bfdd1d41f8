//! Reducer logic for the todo list.
//!
//! Every command either changes state, bumps the revision and returns the
//! persistence effects for what changed, or is a silent no-op: state and
//! revision untouched, no effects, a `debug` log line saying why.

use crate::repository::TodoRepository;
use crate::types::{PersistFailure, TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use todolist_core::environment::{Clock, IdGenerator, SystemClock, TimestampIdGenerator};
use todolist_core::storage::KeyValueStore;
use todolist_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of fresh todo ids
    pub ids: Arc<dyn IdGenerator>,
    /// Durable persistence
    pub repository: TodoRepository,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, repository: TodoRepository) -> Self {
        Self {
            clock,
            ids,
            repository,
        }
    }

    /// System clock and timestamp ids over `store`
    #[must_use]
    pub fn production(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(TimestampIdGenerator),
            TodoRepository::new(store, namespace),
        )
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn persist_items(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let repository = env.repository.clone();
        let items = state.items.clone();
        let revision = state.revision();
        async_effect! {
            match repository.save_items(&items, revision).await {
                Ok(()) => Some(TodoAction::Persisted {
                    key: repository.keys().items.clone(),
                }),
                Err(error) => Some(TodoAction::PersistFailed {
                    key: repository.keys().items.clone(),
                    error: error.to_string(),
                }),
            }
        }
    }

    fn persist_filter(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let repository = env.repository.clone();
        let filter = state.filter;
        let revision = state.revision();
        async_effect! {
            match repository.save_filter(filter, revision).await {
                Ok(()) => Some(TodoAction::Persisted {
                    key: repository.keys().filter.clone(),
                }),
                Err(error) => Some(TodoAction::PersistFailed {
                    key: repository.keys().filter.clone(),
                    error: error.to_string(),
                }),
            }
        }
    }

    fn persist_theme(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let repository = env.repository.clone();
        let theme = state.theme;
        let revision = state.revision();
        async_effect! {
            match repository.save_theme(theme, revision).await {
                Ok(()) => Some(TodoAction::Persisted {
                    key: repository.keys().theme.clone(),
                }),
                Err(error) => Some(TodoAction::PersistFailed {
                    key: repository.keys().theme.clone(),
                    error: error.to_string(),
                }),
            }
        }
    }

    /// Bumps the revision and persists the item collection
    fn items_changed(state: &mut TodoState, env: &TodoEnvironment) -> SmallVec<[Effect<TodoAction>; 4]> {
        state.bump_revision();
        smallvec![Self::persist_items(state, env)]
    }

    fn ignore(action: &str, reason: &str) -> SmallVec<[Effect<TodoAction>; 4]> {
        tracing::debug!(action, reason, "Ignoring todo command");
        SmallVec::new()
    }

    fn remove(state: &mut TodoState, id: &TodoId) -> bool {
        let before = state.items.len();
        state.items.retain(|item| &item.id != id);
        if state.is_editing(id) {
            state.editing = None;
        }
        state.items.len() != before
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per command
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Self::ignore("Add", "empty text");
                }

                let created_at = env.clock.now();
                let id = TodoId::new(env.ids.next_id(created_at));
                state
                    .items
                    .insert(0, TodoItem::new(id, text.to_string(), created_at));

                Self::items_changed(state, env)
            },

            TodoAction::Remove { id } => {
                if !Self::remove(state, &id) {
                    return Self::ignore("Remove", "unknown id");
                }
                Self::items_changed(state, env)
            },

            TodoAction::SetCompleted { id, completed } => {
                let Some(item) = state.get_mut(&id) else {
                    return Self::ignore("SetCompleted", "unknown id");
                };
                item.completed = completed;
                Self::items_changed(state, env)
            },

            TodoAction::BeginEdit { id } => {
                if !state.exists(&id) {
                    return Self::ignore("BeginEdit", "unknown id");
                }
                if state.is_editing(&id) {
                    return Self::ignore("BeginEdit", "already editing");
                }
                state.editing = Some(id);
                state.bump_revision();
                SmallVec::new()
            },

            TodoAction::CommitEdit { id, text } => {
                let text = text.trim();
                if text.is_empty() {
                    // Committing empty text deletes the item
                    if !Self::remove(state, &id) {
                        return Self::ignore("CommitEdit", "unknown id");
                    }
                    return Self::items_changed(state, env);
                }

                let Some(item) = state.get_mut(&id) else {
                    return Self::ignore("CommitEdit", "unknown id");
                };
                item.text = text.to_string();
                if state.is_editing(&id) {
                    state.editing = None;
                }
                Self::items_changed(state, env)
            },

            TodoAction::CancelEdit { id } => {
                if !state.is_editing(&id) {
                    return Self::ignore("CancelEdit", "not editing");
                }
                state.editing = None;
                state.bump_revision();
                SmallVec::new()
            },

            TodoAction::ClearCompleted => {
                if !state.has_completed() {
                    return Self::ignore("ClearCompleted", "nothing completed");
                }
                if let Some(editing) = state.editing.clone() {
                    if state.get(&editing).is_some_and(|item| item.completed) {
                        state.editing = None;
                    }
                }
                state.items.retain(|item| !item.completed);
                Self::items_changed(state, env)
            },

            TodoAction::ToggleAll => {
                if state.items.is_empty() {
                    return Self::ignore("ToggleAll", "no items");
                }
                let completed = !state.is_all_completed();
                for item in &mut state.items {
                    item.completed = completed;
                }
                Self::items_changed(state, env)
            },

            TodoAction::SetFilter { filter } => {
                if state.filter == filter {
                    return Self::ignore("SetFilter", "unchanged");
                }
                state.filter = filter;
                state.bump_revision();
                smallvec![Self::persist_filter(state, env)]
            },

            TodoAction::ToggleTheme => {
                state.theme = state.theme.toggled();
                state.bump_revision();
                smallvec![Self::persist_theme(state, env)]
            },

            // ========== Events ==========
            TodoAction::Persisted { key } => {
                if state.last_error.as_ref().is_some_and(|failure| failure.key == key) {
                    tracing::info!(%key, "Todo state saved again after a failure");
                    state.last_error = None;
                }
                SmallVec::new()
            },

            TodoAction::PersistFailed { key, error } => {
                tracing::warn!(%key, %error, "Failed to persist todo state");
                state.last_error = Some(PersistFailure { key, error });
                SmallVec::new()
            },
        }
    }
}
