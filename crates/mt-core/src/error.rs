//! # AppError
//!
//! Centralized error handling for the Mistake Tracker.
//! A corrupt backing document is never an error; only write-side faults are.

use thiserror::Error;

/// The primary error type for all mt-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (entity name, id)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Unusable request input (e.g. missing body)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Request body over the configured size limit
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Disk full, permission denied, failed rename...
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn mistake_not_found(id: &str) -> Self {
        AppError::NotFound("Mistake".to_string(), id.to_string())
    }
}

/// A specialized Result type for Mistake Tracker logic.
pub type Result<T> = std::result::Result<T, AppError>;
