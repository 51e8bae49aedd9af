//! Construction-time errors.

use thiserror::Error;

/// Errors raised while building a viewport.
///
/// Steady-state event handling never returns these: picking misses and
/// rejected zoom requests degrade to `None`/no-op instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    #[error("image dimensions must be positive")]
    EmptyImage,
    #[error("container dimensions must be positive")]
    EmptyContainer,
}

/// Result type for viewport construction.
pub type ViewportResult<T> = Result<T, ViewportError>;
