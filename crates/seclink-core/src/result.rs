//! Convenience result type alias for Seclink.

use crate::error::AppError;

/// A specialized `Result` type for Seclink operations.
pub type AppResult<T> = Result<T, AppError>;
