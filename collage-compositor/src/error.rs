//! Compositor error types.

use thiserror::Error;

/// Result type for compositor operations.
pub type CompositorResult<T> = Result<T, CompositorError>;

/// Errors that can occur while rendering or exporting.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// Raster byte length does not match its dimensions.
    #[error("Invalid raster data: expected {expected} bytes, got {actual}")]
    InvalidRaster {
        /// Expected byte count (width * height * 4).
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// Two pixel buffers that must agree in shape do not.
    #[error("Buffer mismatch: {0}")]
    BufferMismatch(String),

    /// Resource resolution failed (bad reference, undecodable payload).
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Flatten was asked to export a board with no blocks.
    #[error("Nothing to export: the board is empty")]
    EmptyBoard,

    /// Image decode/encode error.
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// Export file write error.
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
}
