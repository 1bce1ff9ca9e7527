// Domain Error Types

use thiserror::Error;

use crate::domain::task::TaskStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid task state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Unknown task status: {0}")]
    InvalidStatus(String),
}

impl DomainError {
    pub fn invalid_transition(from: TaskStatus, to: TaskStatus) -> Self {
        DomainError::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
