//! Error types for board and editor operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Block not found on the board.
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// Operation does not apply to the block's variant.
    #[error("Invalid operation on block: {0}")]
    InvalidOperation(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document file read/write error.
    #[error("Document I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource resolution failed before any board mutation.
    #[error("Failed to load resource: {0}")]
    ResourceLoad(String),
}
