//! Error types for colfam core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in colfam core operations.
///
/// Every variant is a local contract violation by the caller. None of them
/// are retryable: the core performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// `next` was called on a cursor with nothing remaining.
    #[error("iterator exhausted")]
    IteratorExhausted,

    /// `remove` was called without a preceding `next`, or twice for the
    /// same element.
    #[error("invalid removal state: {message}")]
    InvalidRemovalState {
        /// Description of the violated precondition.
        message: String,
    },

    /// `commit` was called on a batch removal session that was already
    /// committed.
    #[error("batch removal session already committed")]
    SessionAlreadyCommitted,

    /// A strict append was attempted with a column that does not sort after
    /// the last stored column.
    #[error("out of order append: column does not sort after the last stored column")]
    OutOfOrderAppend,
}

impl CoreError {
    /// Creates an invalid removal state error.
    pub fn invalid_removal_state(message: impl Into<String>) -> Self {
        Self::InvalidRemovalState {
            message: message.into(),
        }
    }
}
