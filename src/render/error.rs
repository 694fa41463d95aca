//! Render error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    /// No surface attached
    #[error("No drawing surface attached")]
    SurfaceUnavailable,

    /// Surface attached but not ready to draw
    #[error("Drawing surface is not ready")]
    SurfaceNotReady,

    #[error("Invalid chart dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
}

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;
