//! Convenience result type alias for the grader service.

use crate::error::AppError;

/// A specialized `Result` type for grader operations.
pub type AppResult<T> = Result<T, AppError>;
