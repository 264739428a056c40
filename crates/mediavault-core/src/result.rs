//! Convenience result type alias for MediaVault.

use crate::error::AppError;

/// A specialized `Result` type for MediaVault operations.
pub type AppResult<T> = Result<T, AppError>;
