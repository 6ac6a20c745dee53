//! Error types for allocation.

use thiserror::Error;

/// Result type for allocator operations.
pub type AllocResult<T> = Result<T, AllocError>;

/// Errors that can occur while reserving segment memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The heap could not satisfy the request.
    #[error("out of memory: could not reserve {requested} bytes")]
    OutOfMemory {
        /// Bytes that were requested.
        requested: usize,
    },

    /// The request would push the allocator past its configured limit.
    #[error("memory budget exceeded: requested {requested} bytes, {in_use} of {limit} in use")]
    BudgetExceeded {
        /// Bytes that were requested.
        requested: usize,
        /// Bytes outstanding at the time of the request.
        in_use: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl AllocError {
    /// Returns the number of bytes the failed request asked for.
    #[must_use]
    pub fn requested(&self) -> usize {
        match self {
            Self::OutOfMemory { requested } | Self::BudgetExceeded { requested, .. } => *requested,
        }
    }
}
