//! Error types for icon rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rendering or encoding an icon.
///
/// These never escape [`crate::Icon::render`]; they are logged there and the
/// pass is abandoned.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Drawing surface error.
    #[error(transparent)]
    Canvas(#[from] icon_canvas::CanvasError),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// Image decoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON settings or icon description.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tile grid that cannot split the raster.
    #[error("Invalid tile grid {cols}x{rows} for a {width}x{height} icon")]
    InvalidTileGrid {
        cols: u32,
        rows: u32,
        width: u32,
        height: u32,
    },

    /// A blocking worker task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for RenderError {
    fn from(err: tokio::task::JoinError) -> Self {
        RenderError::Task(err.to_string())
    }
}
