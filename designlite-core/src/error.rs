//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Element not found in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A string could not be parsed as an element id.
    #[error("Invalid element id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// A host named a part of the element frame that does not exist.
    #[error("Unknown hit part: {0}")]
    InvalidHitPart(String),

    /// A host forwarded an event type the editor does not handle.
    #[error("Unsupported pointer event: {0}")]
    UnsupportedEvent(String),

    /// Document or patch serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
