// Job Queue Port (Interface)

use std::time::Duration;

use crate::domain::TaskId;
use crate::error::Result;
use async_trait::async_trait;

/// A queued unit of work as handed to a consumer.
///
/// The payload is the task ID only; the worker re-reads the record from
/// the store, so a job can outlive the task it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedJob {
    /// Queue-assigned message ID
    pub id: i64,
    pub task_id: TaskId,
    /// How many times this job has been handed out, this delivery included
    pub delivery_count: i64,
    /// Enqueue time, milliseconds since epoch
    pub enqueued_at: i64,
}

/// Queue interface for job handoff between submission and the worker.
///
/// Delivery is at-least-once: a dequeued job is leased, not removed, and
/// becomes deliverable again when the lease lapses without an `ack`.
/// Ordering is FIFO by enqueue order for visible jobs.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Append a job for the given task, returning the queue message ID
    async fn enqueue(&self, task_id: &TaskId) -> Result<i64>;

    /// Lease the oldest visible job for `lease`, or `None` when idle.
    ///
    /// While leased the job is invisible to other consumers.
    async fn dequeue(&self, lease: Duration) -> Result<Option<QueuedJob>>;

    /// Remove a consumed job permanently
    async fn ack(&self, job: &QueuedJob) -> Result<()>;

    /// Give a job back for redelivery.
    ///
    /// The queue drops jobs whose delivery budget is exhausted instead of
    /// redelivering them forever.
    async fn nack(&self, job: &QueuedJob) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::error::AppError;

    /// Mock queue behavior
    #[derive(Debug, Clone)]
    pub enum MockQueueBehavior {
        /// Accept every job
        Accept,
        /// Reject every enqueue with a queue error
        RejectEnqueue(String),
    }

    /// In-memory Job Queue for testing (strict FIFO, no leases)
    pub struct MockJobQueue {
        behavior: MockQueueBehavior,
        jobs: Mutex<VecDeque<QueuedJob>>,
        next_id: Mutex<i64>,
    }

    impl MockJobQueue {
        pub fn new(behavior: MockQueueBehavior) -> Self {
            Self {
                behavior,
                jobs: Mutex::new(VecDeque::new()),
                next_id: Mutex::new(0),
            }
        }

        pub fn new_accepting() -> Self {
            Self::new(MockQueueBehavior::Accept)
        }

        pub fn new_rejecting(message: impl Into<String>) -> Self {
            Self::new(MockQueueBehavior::RejectEnqueue(message.into()))
        }

        /// Jobs currently waiting for delivery
        pub fn queued_len(&self) -> usize {
            self.jobs.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JobQueue for MockJobQueue {
        async fn enqueue(&self, task_id: &TaskId) -> Result<i64> {
            if let MockQueueBehavior::RejectEnqueue(msg) = &self.behavior {
                return Err(AppError::Queue(msg.clone()));
            }

            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            self.jobs.lock().unwrap().push_back(QueuedJob {
                id: *next_id,
                task_id: task_id.clone(),
                delivery_count: 0,
                enqueued_at: 0,
            });
            Ok(*next_id)
        }

        async fn dequeue(&self, _lease: Duration) -> Result<Option<QueuedJob>> {
            Ok(self.jobs.lock().unwrap().pop_front().map(|mut job| {
                job.delivery_count += 1;
                job
            }))
        }

        async fn ack(&self, _job: &QueuedJob) -> Result<()> {
            Ok(())
        }

        async fn nack(&self, job: &QueuedJob) -> Result<()> {
            self.jobs.lock().unwrap().push_back(job.clone());
            Ok(())
        }
    }
}
