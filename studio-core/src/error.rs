//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in editor operations.
///
/// Stale ids, degenerate reorders and size clamps are absorbed as no-ops and
/// never show up here; only session starts, page addressing and
/// serialization report failures.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found on the current page.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Page index out of range.
    #[error("Page not found: {0}")]
    PageNotFound(usize),

    /// The element is locked and rejects transform sessions.
    #[error("Element is locked: {0}")]
    ElementLocked(String),

    /// Another pointer session is still active.
    #[error("A pointer session is already active")]
    SessionActive,

    /// The element has no timeline placement.
    #[error("Element is not on the timeline: {0}")]
    NotOnTimeline(String),

    /// Invalid element operation.
    #[error("Invalid operation on element: {0}")]
    InvalidOperation(String),

    /// State serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
