// Task Service - Submission and removal use cases

use std::sync::Arc;

use tracing::{debug, error};

use crate::application::hub::NotificationHub;
use crate::domain::{Task, TaskEvent, TaskId};
use crate::error::{AppError, Result};
use crate::port::{JobQueue, TaskStore};

/// Front door of the pipeline: validates input, persists records, hands
/// jobs to the queue and announces lifecycle changes through the hub.
///
/// The service never advances task status; that is the worker's job.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    queue: Arc<dyn JobQueue>,
    hub: NotificationHub,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, queue: Arc<dyn JobQueue>, hub: NotificationHub) -> Self {
        Self { store, queue, hub }
    }

    /// The hub this service publishes to
    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Accept a new task: validate, persist, enqueue, announce.
    ///
    /// A failed enqueue does not roll the record back. The task stays
    /// `pending` without a job; the gap is logged, and the caller still
    /// receives the created record.
    pub async fn submit(&self, title: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Task title is required".to_string()));
        }

        let task = self.store.create(title).await?;

        match self.queue.enqueue(&task.id).await {
            Ok(job_id) => {
                debug!(task_id = %task.id, job_id, "Task enqueued for processing");
            }
            Err(e) => {
                // Record exists but no job does; surface the gap instead of
                // failing the submission or deleting the record.
                error!(
                    task_id = %task.id,
                    error = %e,
                    "Task persisted but job enqueue failed; task will stay pending"
                );
            }
        }

        self.hub.publish(TaskEvent::created(task.clone()));
        Ok(task)
    }

    /// All current records, newest first
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.store.list().await
    }

    /// Fetch one record
    pub async fn get(&self, id: &TaskId) -> Result<Task> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task not found: {}", id)))
    }

    /// Remove a record and announce the removal.
    ///
    /// Any queued or in-flight job for this task is left alone; the worker
    /// discovers the deletion on its own and abandons the work.
    pub async fn remove(&self, id: &TaskId) -> Result<()> {
        self.store.delete(id).await?;
        self.hub.publish(TaskEvent::deleted(id.clone()));
        Ok(())
    }
}
