//! Error types for icon-canvas.

use thiserror::Error;

/// Result type alias using CanvasError.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while drawing on a [`crate::Canvas`].
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// Path could not be converted or rasterized.
    #[error("Path error: {0}")]
    PathError(String),
}

impl From<png::EncodingError> for CanvasError {
    fn from(err: png::EncodingError) -> Self {
        CanvasError::PngError(err.to_string())
    }
}
