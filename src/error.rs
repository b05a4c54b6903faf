//! Error types for the paint surface

use thiserror::Error;

/// Result type alias for paint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, measuring or painting
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The requested background cannot be painted into an opaque image
    #[error("Transparent background is not supported (got {0})")]
    InvalidBackground(String),

    /// The pixel surface could not be allocated
    #[error("Failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// Font data could not be parsed
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// No face is registered for the requested family
    #[error("Font family not found: {0}")]
    FontNotFound(String),

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// The layout core failed while laying out or painting
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
