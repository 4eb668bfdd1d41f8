//! Declarative macros for ergonomic effect construction
//!
//! `async_effect!` saves the boxing boilerplate when a reducer hands a
//! storage write to the runtime.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use todolist_core::async_effect;
///
/// async_effect! {
///     match repository.save_theme(theme, revision).await {
///         Ok(()) => Some(TodoAction::Persisted { key }),
///         Err(error) => Some(TodoAction::PersistFailed { key, error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
