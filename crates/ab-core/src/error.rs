//! # AppError
//!
//! Centralized error handling for anonboard.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all ab-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Thread, Reply)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., missing text, malformed identifier)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Delete password did not match the stored one
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down, constraint violation)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for anonboard logic.
pub type Result<T> = std::result::Result<T, AppError>;
