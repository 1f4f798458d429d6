//! Engine error types

use thiserror::Error;

use crate::engine::Status;

/// Errors returned by engine lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine was not in the status the operation requires. Nothing was
    /// changed; the caller may retry later.
    #[error("status mismatch: expected {expected}, found {actual}")]
    StatusMismatch { expected: Status, actual: Status },
}

/// Result type for engine lifecycle operations
pub type EngineResult<T> = Result<T, EngineError>;
