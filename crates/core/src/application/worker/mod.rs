// Worker - Task processing loop

pub mod constants;
mod shutdown;

use constants::*;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::application::hub::NotificationHub;
use crate::domain::{DomainError, Task, TaskEvent, TaskId, TaskPatch, TaskStatus};
use crate::error::Result;
use crate::port::{JobQueue, QueuedJob, TaskProcessor, TaskStore, TimeProvider};

/// The single consumer of the job queue.
///
/// Owns every status transition: `pending -> processing` when it claims a
/// task and `processing -> {completed | failed}` when the work resolves.
/// Nothing else in the system writes task status.
pub struct Worker {
    store: Arc<dyn TaskStore>,
    queue: Arc<dyn JobQueue>,
    processor: Arc<dyn TaskProcessor>,
    hub: NotificationHub,
    time_provider: Arc<dyn TimeProvider>,
}

impl Worker {
    pub fn new(
        store: Arc<dyn TaskStore>,
        queue: Arc<dyn JobQueue>,
        processor: Arc<dyn TaskProcessor>,
        hub: NotificationHub,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            queue,
            processor,
            hub,
            time_provider,
        }
    }

    /// Run worker loop with graceful shutdown support.
    ///
    /// Job-level trouble never escapes this loop: a failed cycle is logged,
    /// followed by a recovery pause, and the loop continues.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Worker started");
        loop {
            // Check for shutdown signal
            if shutdown.is_shutdown() {
                info!("Worker shutting down");
                break;
            }
            match self.process_next_job().await {
                Ok(processed) => {
                    if !processed {
                        // No job available, sleep briefly (or wait for shutdown)
                        tokio::select! {
                            _ = sleep(IDLE_SLEEP_DURATION) => {},
                            _ = shutdown.wait() => {
                                info!("Worker interrupted during idle");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Worker error: {}", e);
                    tokio::select! {
                        _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Worker interrupted during error recovery");
                            break;
                        }
                    }
                }
            }
        }
        info!("Worker stopped");
        Ok(())
    }

    /// Consume one job from the queue (returns true if a job was consumed).
    ///
    /// A job whose task record is missing or already finished is dropped
    /// without processing; redelivered jobs for a `processing` task resume
    /// the work phase without repeating the claim.
    pub async fn process_next_job(&self) -> Result<bool> {
        let job = match self.queue.dequeue(JOB_LEASE_DURATION).await? {
            Some(job) => job,
            None => return Ok(false), // No job available
        };

        let task = match self.store.find_by_id(&job.task_id).await? {
            Some(task) => task,
            None => {
                // Record deleted before the job was consumed. Drop the job;
                // a deleted task is never resurrected.
                debug!(task_id = %job.task_id, "Dequeued job for a deleted task, dropping");
                self.queue.ack(&job).await?;
                return Ok(true);
            }
        };

        let task = match task.status {
            TaskStatus::Pending => match self.claim(task).await? {
                Some(task) => task,
                None => {
                    // Deleted between the read and the claim
                    self.queue.ack(&job).await?;
                    return Ok(true);
                }
            },
            TaskStatus::Processing => {
                // Redelivered job for a task a previous run claimed but never
                // finished. processed_at keeps its original value and the
                // processing announcement is not repeated.
                info!(
                    task_id = %task.id,
                    delivery_count = job.delivery_count,
                    "Resuming task from redelivered job"
                );
                task
            }
            TaskStatus::Completed | TaskStatus::Failed => {
                debug!(
                    task_id = %task.id,
                    status = %task.status,
                    "Stale redelivery for a finished task, dropping"
                );
                self.queue.ack(&job).await?;
                return Ok(true);
            }
        };

        // Run the unit of work on its own task so a panic inside the
        // processor is caught here instead of killing the loop.
        let processor = Arc::clone(&self.processor);
        let task_for_exec = task.clone();
        let handle = tokio::task::spawn(async move { processor.process(&task_for_exec).await });
        let outcome = handle.await;

        match outcome {
            Ok(Ok(result)) => self.complete(&job, &task.id, result).await?,
            Ok(Err(e)) => {
                warn!(task_id = %task.id, error = %e, "Task processing failed");
                self.fail(&job, &task.id).await?;
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    error!(task_id = %task.id, "Task processing panicked: {:?}", join_err);
                } else {
                    error!(task_id = %task.id, "Task processing cancelled: {:?}", join_err);
                }
                self.fail(&job, &task.id).await?;
            }
        }
        Ok(true)
    }

    /// Claim a pending task: the one-time `processed_at` write plus the
    /// processing announcement. Returns `None` when the record is gone.
    async fn claim(&self, task: Task) -> Result<Option<Task>> {
        if !task.status.can_transition_to(TaskStatus::Processing) {
            return Err(
                DomainError::invalid_transition(task.status, TaskStatus::Processing).into(),
            );
        }

        let patch = TaskPatch::begin_processing(self.time_provider.now());
        match self.store.update(&task.id, patch).await {
            Ok(updated) => {
                info!(task_id = %updated.id, "Processing task");
                self.hub.publish(TaskEvent::processing(updated.id.clone()));
                Ok(Some(updated))
            }
            Err(e) if e.is_not_found() => {
                debug!(task_id = %task.id, "Task deleted before processing began, dropping job");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist and announce a completed task, then retire the job.
    async fn complete(&self, job: &QueuedJob, task_id: &TaskId, result: String) -> Result<()> {
        match self.store.update(task_id, TaskPatch::complete(result)).await {
            Ok(updated) => {
                info!(task_id = %updated.id, "Task completed");
                self.hub.publish(TaskEvent::completed(updated));
                self.queue.ack(job).await
            }
            Err(e) if e.is_not_found() => {
                // Deleted while we were working. Discard the result and the
                // job; the record must not come back.
                debug!(task_id = %task_id, "Task deleted during processing, discarding result");
                self.queue.ack(job).await
            }
            Err(e) => {
                // Store unavailable at the terminal write. Hand the job back
                // so the work resumes on a later delivery.
                self.queue.nack(job).await?;
                Err(e)
            }
        }
    }

    /// Record a failed task and re-signal the job to the queue.
    ///
    /// No event is published for failures; observers learn about them by
    /// fetching the record.
    async fn fail(&self, job: &QueuedJob, task_id: &TaskId) -> Result<()> {
        match self.store.update(task_id, TaskPatch::fail()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                debug!(task_id = %task_id, "Task deleted during processing, nothing to mark failed");
            }
            Err(e) => {
                error!(task_id = %task_id, error = %e, "Could not persist failed status");
            }
        }
        self.queue.nack(job).await
    }
}
