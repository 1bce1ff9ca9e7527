// Task Store Port (Interface)

use crate::domain::{Task, TaskId, TaskPatch};
use crate::error::Result;
use async_trait::async_trait;

/// Store interface for Task persistence.
///
/// Records are independent rows; there are no cross-record invariants and
/// no ordering guarantees beyond what `list` states.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist a new pending task and return the full record
    async fn create(&self, title: &str) -> Result<Task>;

    /// Find task by ID (`None` when absent, deletion is not an error here)
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>>;

    /// All current records, newest first
    async fn list(&self) -> Result<Vec<Task>>;

    /// Apply a partial update and return the updated record.
    ///
    /// Fails with `AppError::NotFound` when the record no longer exists;
    /// an update never recreates a deleted record.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Task>;

    /// Remove a record. Fails with `AppError::NotFound` when absent.
    async fn delete(&self, id: &TaskId) -> Result<()>;
}
