//! Error types for timebox
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Reasons a cache lookup produced no value.
///
/// The plain `get` API folds both variants into `None`; `try_get` keeps them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key was never stored, or was already evicted
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was present but its deadline had passed; it has now been evicted
    #[error("Key expired: {0}")]
    Expired(String),
}

// == Task Error Enum ==
/// Failure surfaced by the task aggregator.
///
/// Only the first failure observed in time is ever reported.
#[derive(Error, Debug)]
pub enum TaskError<E> {
    /// The task's future resolved to an error
    #[error("task {index} rejected: {error}")]
    Rejected { index: usize, error: E },

    /// The task panicked, either while being invoked or while being polled
    #[error("task {index} panicked: {message}")]
    Panicked { index: usize, message: String },
}

impl<E> TaskError<E> {
    /// Submission index of the task that failed.
    pub fn index(&self) -> usize {
        match self {
            TaskError::Rejected { index, .. } | TaskError::Panicked { index, .. } => *index,
        }
    }

    /// Returns the task's own error value, unmodified, if the task rejected.
    pub fn into_rejection(self) -> Option<E> {
        match self {
            TaskError::Rejected { error, .. } => Some(error),
            TaskError::Panicked { .. } => None,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, TaskError::Panicked { .. })
    }

    /// Builds a `Panicked` error from a caught panic payload.
    pub(crate) fn from_panic(index: usize, payload: Box<dyn std::any::Any + Send>) -> Self {
        TaskError::Panicked {
            index,
            message: panic_message(payload.as_ref()),
        }
    }
}

/// Extracts the human-readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache lookups.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        assert_eq!(CacheError::NotFound("a".into()).to_string(), "Key not found: a");
        assert_eq!(CacheError::Expired("b".into()).to_string(), "Key expired: b");
    }

    #[test]
    fn test_task_error_index_and_rejection() {
        let err: TaskError<&str> = TaskError::Rejected { index: 2, error: "boom" };
        assert_eq!(err.index(), 2);
        assert!(!err.is_panic());
        assert_eq!(err.to_string(), "task 2 rejected: boom");
        assert_eq!(err.into_rejection(), Some("boom"));
    }

    #[test]
    fn test_task_error_panicked() {
        let err: TaskError<String> = TaskError::Panicked {
            index: 0,
            message: "bad".to_string(),
        };
        assert!(err.is_panic());
        assert_eq!(err.index(), 0);
        assert!(err.into_rejection().is_none());
    }

    #[test]
    fn test_panic_message_payloads() {
        let static_payload: Box<dyn std::any::Any + Send> = Box::new("static");
        let owned_payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        let other_payload: Box<dyn std::any::Any + Send> = Box::new(42u32);

        assert_eq!(panic_message(static_payload.as_ref()), "static");
        assert_eq!(panic_message(owned_payload.as_ref()), "owned");
        assert_eq!(panic_message(other_payload.as_ref()), "unknown panic payload");
    }
}
