//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image bytes or a data URI could not be read.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Rasterization, encoding, or document assembly failed.
    #[error("Export failed: {0}")]
    Export(String),
}
