// Task Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task ID (UUID v4, assigned by the store)
pub type TaskId = String;

/// Task lifecycle status.
///
/// Transitions are forward-only: `pending -> processing -> {completed | failed}`.
/// A task never re-enters an earlier state and terminal states accept no
/// further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// The full transition table of the worker state machine
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Processing)
                | (TaskStatus::Processing, TaskStatus::Completed)
                | (TaskStatus::Processing, TaskStatus::Failed)
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::domain::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "processing" => Ok(TaskStatus::Processing),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(crate::domain::error::DomainError::InvalidStatus(
                other.to_string(),
            )),
        }
    }
}

/// Task Entity
///
/// The store owns the persisted record; after creation only the worker
/// writes `status`, `processed_at` and `result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    /// Empty until the task completes; stays empty on failure
    pub result: String,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, at the pending -> processing transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new pending task
    ///
    /// # Arguments
    ///
    /// * `id` - Unique task ID (injected, not generated)
    /// * `title` - Non-empty task title (validated at the service boundary)
    /// * `created_at` - Creation timestamp (injected, not system time)
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: TaskStatus::Pending,
            result: String::new(),
            created_at,
            processed_at: None,
        }
    }
}

/// Partial update applied by `TaskStore::update`.
///
/// `None` fields keep their stored value. The three constructors produce
/// exactly the write shapes the worker is allowed to persist.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub result: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// The pending -> processing write: status plus the one-time `processed_at`
    pub fn begin_processing(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(TaskStatus::Processing),
            result: None,
            processed_at: Some(now),
        }
    }

    /// The processing -> completed write: status plus the work result
    pub fn complete(result: impl Into<String>) -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            result: Some(result.into()),
            processed_at: None,
        }
    }

    /// The processing -> failed write: status only, result stays empty
    pub fn fail() -> Self {
        Self {
            status: Some(TaskStatus::Failed),
            result: None,
            processed_at: None,
        }
    }
}
