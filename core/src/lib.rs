//! # Todolist Core
//!
//! Core traits and types for the todolist reducer architecture.
//!
//! This crate provides the fundamental abstractions the todo application is
//! built on: a pure reducer, side effects described as values, and injected
//! dependencies.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and feedback events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//! - **Storage**: The durable key-value substrate effects write to
//!
//! ## Example
//!
//! ```ignore
//! use todolist_core::*;
//!
//! impl Reducer for TodoReducer {
//!     type State = TodoState;
//!     type Action = TodoAction;
//!     type Environment = TodoEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoState,
//!         action: TodoAction,
//!         env: &TodoEnvironment,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Declarative macros for building effects
pub mod effect_macros;

/// Durable key-value storage abstraction
pub mod storage;

/// State module - Domain state helpers
///
/// State represents the current domain state of a feature.
/// It should be owned data, Clone-able, and avoid lifetimes where possible.
pub mod state {
    use serde::{Deserialize, Serialize};

    /// Monotonic change counter for a piece of state
    ///
    /// Reducers bump the revision whenever an action changes what observers
    /// can see. Observers remember the last revision they handled and react
    /// when the current one differs. No-op actions leave it untouched.
    ///
    /// Use `#[derive(State)]` with a `#[revision]` field to generate the
    /// `revision()` and `bump_revision()` accessors.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct Revision(u64);

    impl Revision {
        /// Creates a revision with the given value
        #[must_use]
        pub const fn new(value: u64) -> Self {
            Self(value)
        }

        /// The revision of freshly loaded state
        #[must_use]
        pub const fn initial() -> Self {
            Self(0)
        }

        /// Returns the revision that follows this one
        #[must_use]
        pub const fn next(self) -> Self {
            Self(self.0.saturating_add(1))
        }

        /// Returns the raw counter value
        #[must_use]
        pub const fn value(self) -> u64 {
            self.0
        }
    }

    impl std::fmt::Display for Revision {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "r{}", self.0)
        }
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = TodoAction;
    ///     type Environment = TodoEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut TodoState,
    ///         action: TodoAction,
    ///         env: &TodoEnvironment,
    ///     ) -> SmallVec<[Effect<TodoAction>; 4]> {
    ///         match action {
    ///             TodoAction::ToggleTheme => {
    ///                 state.theme = state.theme.toggled();
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// An action that fails validation should leave state untouched and
        /// return no effects.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution); a reducer returns as many as it needs.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use rand::Rng;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Generates identifiers for newly created entities
    ///
    /// Implementations must produce values that are unique among live
    /// entities with overwhelming probability. Collisions are not detected.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier; `now` is the creation time of the entity
        fn next_id(&self, now: DateTime<Utc>) -> String;
    }

    const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    const ID_SUFFIX_LEN: usize = 6;

    /// Production id generator: `<epoch-millis>-<6 random base-36 chars>`
    ///
    /// ```
    /// use todolist_core::environment::{IdGenerator, TimestampIdGenerator};
    /// use chrono::Utc;
    ///
    /// let id = TimestampIdGenerator.next_id(Utc::now());
    /// let (millis, suffix) = id.split_once('-').unwrap();
    /// assert!(millis.parse::<i64>().is_ok());
    /// assert_eq!(suffix.len(), 6);
    /// ```
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TimestampIdGenerator;

    impl IdGenerator for TimestampIdGenerator {
        fn next_id(&self, now: DateTime<Utc>) -> String {
            let mut rng = rand::thread_rng();
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
                .collect();
            format!("{}-{suffix}", now.timestamp_millis())
        }
    }
}
