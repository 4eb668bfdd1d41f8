//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of short text items (newest first),
//! a view filter over that collection, and a display theme. The item
//! collection, filter and theme are persisted; which item is being edited and
//! the change revision live only in memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use todolist_core::state::Revision;
use todolist_macros::State;

/// Unique identifier for a todo item
///
/// Opaque; assigned once at creation and never reassigned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single todo item
///
/// Serialized as `{ "id", "text", "completed", "createdAt" }` with
/// `createdAt` in epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Trimmed, non-empty text
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// When the todo was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }
}

/// Error returned when a filter or theme name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Which subset of the collection is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    /// All filters, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Returns true if `item` belongs to this filter's subset
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    /// Stable name used for persistence and display
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "filter",
                value: s.to_string(),
            })
    }
}

/// Display theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background (default)
    #[default]
    Dark,
    /// Light background
    Light,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Stable name used for persistence
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Icon shown in the header
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Dark => "🌙",
            Self::Light => "☀️",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(UnknownVariant {
                kind: "theme",
                value: other.to_string(),
            }),
        }
    }
}

/// Aggregate counters shown under the list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    /// Items not yet completed
    pub remaining: usize,
    /// All items
    pub total: usize,
}

/// A storage write that did not go through
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("could not save {key}: {error}")]
pub struct PersistFailure {
    /// Storage key that was being written
    pub key: String,
    /// Error message
    pub error: String,
}

/// State of the todo list
#[derive(State, Clone, Debug, Default)]
pub struct TodoState {
    /// All items, newest first
    pub items: Vec<TodoItem>,
    /// Active view filter
    pub filter: Filter,
    /// Display theme
    pub theme: Theme,
    /// Item currently being edited, never persisted
    pub editing: Option<TodoId>,
    /// Latest persistence failure, cleared once that key saves again
    pub last_error: Option<PersistFailure>,
    #[revision]
    revision: Revision,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding `items` with default filter and theme
    #[must_use]
    pub fn with_items(items: Vec<TodoItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Returns a mutable todo by ID
    pub fn get_mut(&mut self, id: &TodoId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Items matching the active filter, in collection order
    #[must_use]
    pub fn visible_items(&self) -> Vec<&TodoItem> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    /// Remaining and total counts
    #[must_use]
    pub fn counts(&self) -> Counts {
        Counts {
            remaining: self.items.iter().filter(|item| !item.completed).count(),
            total: self.items.len(),
        }
    }

    /// True when there is at least one item and every item is completed
    #[must_use]
    pub fn is_all_completed(&self) -> bool {
        let counts = self.counts();
        counts.total > 0 && counts.remaining == 0
    }

    /// True when at least one item is completed
    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|item| item.completed)
    }

    /// Checks if `id` is the item being edited
    #[must_use]
    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.editing.as_ref() == Some(id)
    }
}

/// Actions representing commands and feedback events for the todo list
///
/// Commands are user gestures forwarded verbatim (no pre-trimming or
/// validation). Events are produced by persistence effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Add a new todo at the front
    Add {
        /// Raw text as typed
        text: String,
    },

    /// Command: Remove a todo
    Remove {
        /// Todo to remove
        id: TodoId,
    },

    /// Command: Set a todo's completion flag
    SetCompleted {
        /// Todo to update
        id: TodoId,
        /// New completion flag
        completed: bool,
    },

    /// Command: Start editing a todo
    BeginEdit {
        /// Todo to edit
        id: TodoId,
    },

    /// Command: Finish editing; empty text removes the todo
    CommitEdit {
        /// Todo being edited
        id: TodoId,
        /// Raw replacement text
        text: String,
    },

    /// Command: Abandon editing without changing the text
    CancelEdit {
        /// Todo being edited
        id: TodoId,
    },

    /// Command: Remove every completed todo
    ClearCompleted,

    /// Command: Complete everything, or un-complete everything if all are done
    ToggleAll,

    /// Command: Change the view filter
    SetFilter {
        /// New filter
        filter: Filter,
    },

    /// Command: Switch between dark and light
    ToggleTheme,

    // ========== Events ==========
    /// Event: A storage write went through
    Persisted {
        /// Storage key that was written
        key: String,
    },

    /// Event: A storage write failed
    PersistFailed {
        /// Storage key that was being written
        key: String,
        /// Error message
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, completed: bool) -> TodoItem {
        TodoItem {
            completed,
            ..TodoItem::new(TodoId::from(id), format!("item {id}"), Utc::now())
        }
    }

    #[test]
    fn todo_item_new() {
        let id = TodoId::from("1-abcdef");
        let now = Utc::now();
        let item = TodoItem::new(id.clone(), "Test todo".to_string(), now);

        assert_eq!(item.id, id);
        assert_eq!(item.text, "Test todo");
        assert!(!item.completed);
        assert_eq!(item.created_at, now);
    }

    #[test]
    fn todo_item_wire_format() {
        let created_at = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        let item = TodoItem::new(TodoId::from("1700000000123-k3j9x0"), "Buy milk".into(), created_at);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1700000000123-k3j9x0",
                "text": "Buy milk",
                "completed": false,
                "createdAt": 1_700_000_000_123_i64,
            })
        );
    }

    #[test]
    fn filter_names() {
        for filter in Filter::ALL {
            assert_eq!(filter.as_str().parse::<Filter>(), Ok(filter));
        }
        assert!("done".parse::<Filter>().is_err());
        assert_eq!(Filter::default(), Filter::All);
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(
            "sepia".parse::<Theme>().unwrap_err().to_string(),
            "unknown theme `sepia`"
        );
    }

    #[test]
    fn todo_state_counts() {
        let mut state = TodoState::new();
        assert_eq!(state.counts(), Counts::default());
        assert!(!state.is_all_completed());

        state.items = vec![item("1", false), item("2", true)];
        assert_eq!(state.counts(), Counts { remaining: 1, total: 2 });
        assert!(!state.is_all_completed());
        assert!(state.has_completed());

        state.items[0].completed = true;
        assert!(state.is_all_completed());
    }

    #[test]
    fn visible_items_follow_filter_and_order() {
        let mut state = TodoState::with_items(vec![item("1", false), item("2", true), item("3", false)]);

        let ids = |state: &TodoState| -> Vec<String> {
            state.visible_items().iter().map(|t| t.id.to_string()).collect()
        };

        assert_eq!(ids(&state), ["1", "2", "3"]);
        state.filter = Filter::Active;
        assert_eq!(ids(&state), ["1", "3"]);
        state.filter = Filter::Completed;
        assert_eq!(ids(&state), ["2"]);
    }

    #[test]
    fn persist_failure_names_the_key() {
        let failure = PersistFailure {
            key: "todos.v1".to_string(),
            error: "disk full".to_string(),
        };
        assert_eq!(failure.to_string(), "could not save todos.v1: disk full");
    }
}
