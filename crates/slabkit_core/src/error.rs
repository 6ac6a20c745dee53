//! Error types for slabkit core.

use slabkit_storage::AllocError;
use thiserror::Error;

/// Result type for core operations.
pub type SlabResult<T> = Result<T, SlabError>;

/// Errors that can occur in slab operations.
#[derive(Debug, Error)]
pub enum SlabError {
    /// Segment or bag memory could not be reserved.
    #[error("allocation failed: {0}")]
    Alloc(#[from] AllocError),

    /// A collection could not grow.
    #[error("out of memory: could not grow to {requested} items")]
    OutOfMemory {
        /// Number of items the collection tried to make room for.
        requested: usize,
    },

    /// Record size is not usable.
    #[error("invalid item size: {size}")]
    InvalidItemSize {
        /// The rejected size in bytes.
        size: usize,
    },

    /// A record does not match the store's fixed size.
    #[error("record size mismatch: expected {expected} bytes, got {actual}")]
    RecordSizeMismatch {
        /// The store's item size.
        expected: usize,
        /// Length of the offered record.
        actual: usize,
    },

    /// `advance` was called without a pending successful `peek`.
    #[error("cursor has no peeked record to advance past")]
    CursorNotPositioned,

    /// Configuration cannot be honoured.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl SlabError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a record size mismatch error.
    pub fn record_size_mismatch(expected: usize, actual: usize) -> Self {
        Self::RecordSizeMismatch { expected, actual }
    }

    /// Returns `true` for resource exhaustion, as opposed to misuse.
    #[must_use]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::Alloc(_) | Self::OutOfMemory { .. })
    }
}
