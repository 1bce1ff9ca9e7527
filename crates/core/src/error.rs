// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type.
///
/// `Store` and `Queue` are kept distinct so callers can tell a broken
/// task store apart from a broken job queue; a submit that persisted the
/// record but failed to hand the job off reports a queue failure, not a
/// store failure.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Processing error: {0}")]
    Processing(#[from] crate::port::ProcessingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the error reports a missing record rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite, which decides
// per call site whether a failure is a Store or a Queue error.
