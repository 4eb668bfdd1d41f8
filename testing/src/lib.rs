//! # Todolist Testing
//!
//! Testing utilities and helpers for the todolist reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits ([`FixedClock`], [`SequentialIdGenerator`])
//! - An in-memory durable store ([`InMemoryKeyValueStore`]) that records writes
//! - The [`ReducerTest`] Given-When-Then harness and effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use todolist_testing::{test_clock, InMemoryKeyValueStore, SequentialIdGenerator};
//!
//! #[tokio::test]
//! async fn add_persists_items() {
//!     let storage = InMemoryKeyValueStore::new();
//!     let store = todo_store(storage.clone());
//!
//!     store.send(TodoAction::Add { text: "milk".into() }).await?.wait().await;
//!
//!     assert_eq!(storage.write_count("todos.v1"), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use todolist_core::environment::{Clock, IdGenerator};

/// Ergonomic testing utilities for reducers
pub mod reducer_test;

/// In-memory durable store for tests
pub mod storage_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::FixedClock;
    /// use todolist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Predictable ids: `todo-1`, `todo-2`, ...
    ///
    /// ```
    /// use todolist_testing::SequentialIdGenerator;
    /// use todolist_core::environment::IdGenerator;
    /// use chrono::Utc;
    ///
    /// let ids = SequentialIdGenerator::new("todo");
    /// assert_eq!(ids.next_id(Utc::now()), "todo-1");
    /// assert_eq!(ids.next_id(Utc::now()), "todo-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose ids start at `<prefix>-1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self, _now: DateTime<Utc>) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, SequentialIdGenerator};
pub use reducer_test::{assertions, ReducerTest};
pub use storage_mocks::InMemoryKeyValueStore;
