//! CLI error types.

use slabkit_core::SlabError;
use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The slab engine rejected an operation.
    #[error(transparent)]
    Slab(#[from] SlabError),

    /// JSON output could not be produced.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A producer thread panicked before returning its slab.
    #[error("producer {index} panicked")]
    ProducerPanicked {
        /// Producer index.
        index: usize,
    },

    /// Merged output did not match what was appended.
    #[error("verification failed for producer {producer}: {message}")]
    Verification {
        /// Producer index.
        producer: usize,
        /// What went wrong.
        message: String,
    },
}

impl CliError {
    /// Creates a verification error.
    pub fn verification(producer: usize, message: impl Into<String>) -> Self {
        Self::Verification {
            producer,
            message: message.into(),
        }
    }
}
