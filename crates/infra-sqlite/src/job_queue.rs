// SQLite JobQueue Implementation
//
// Lease-based delivery: dequeue hides the job for the lease window instead
// of removing it, so jobs held by a crashed consumer become deliverable
// again on their own.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use taskflow_core::application::worker::constants::MAX_JOB_DELIVERIES;
use taskflow_core::domain::TaskId;
use taskflow_core::error::{AppError, Result};
use taskflow_core::port::{JobQueue, QueuedJob, TimeProvider};

use crate::sqlx_error;

fn map_sqlx_error(err: sqlx::Error) -> AppError {
    AppError::Queue(sqlx_error::describe(&err))
}

pub struct SqliteJobQueue {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteJobQueue {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl JobQueue for SqliteJobQueue {
    async fn enqueue(&self, task_id: &TaskId) -> Result<i64> {
        let now = self.time_provider.now_millis();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (task_id, enqueued_at, visible_at, delivery_count)
            VALUES (?, ?, ?, 0)
            RETURNING id
            "#,
        )
        .bind(task_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(id)
    }

    async fn dequeue(&self, lease: Duration) -> Result<Option<QueuedJob>> {
        let now = self.time_provider.now_millis();
        let invisible_until = now + lease.as_millis() as i64;

        // Claim and hide in a single statement; SQLite runs it atomically,
        // so two consumers can never lease the same job.
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET visible_at = ?, delivery_count = delivery_count + 1
            WHERE id = (
                SELECT id FROM jobs
                WHERE visible_at <= ?
                ORDER BY id ASC
                LIMIT 1
            )
            RETURNING id, task_id, delivery_count, enqueued_at
            "#,
        )
        .bind(invisible_until)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_queued_job()))
    }

    async fn ack(&self, job: &QueuedJob) -> Result<()> {
        sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(job.id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn nack(&self, job: &QueuedJob) -> Result<()> {
        if job.delivery_count >= MAX_JOB_DELIVERIES {
            warn!(
                job_id = job.id,
                task_id = %job.task_id,
                delivery_count = job.delivery_count,
                "Job exhausted its delivery budget, dropping"
            );
            sqlx::query("DELETE FROM jobs WHERE id = ?")
                .bind(job.id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
            return Ok(());
        }

        let now = self.time_provider.now_millis();
        sqlx::query("UPDATE jobs SET visible_at = ? WHERE id = ?")
            .bind(now)
            .bind(job.id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    task_id: String,
    delivery_count: i64,
    enqueued_at: i64,
}

impl JobRow {
    fn into_queued_job(self) -> QueuedJob {
        QueuedJob {
            id: self.id,
            task_id: self.task_id,
            delivery_count: self.delivery_count,
            enqueued_at: self.enqueued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use taskflow_core::port::time_provider::SystemTimeProvider;

    const TEST_LEASE: Duration = Duration::from_secs(30);

    async fn setup_test_queue() -> SqliteJobQueue {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteJobQueue::new(pool, Arc::new(SystemTimeProvider))
    }

    #[tokio::test]
    async fn test_delivers_in_enqueue_order() {
        let queue = setup_test_queue().await;

        queue.enqueue(&"task-a".to_string()).await.unwrap();
        queue.enqueue(&"task-b".to_string()).await.unwrap();

        let first = queue.dequeue(TEST_LEASE).await.unwrap().unwrap();
        let second = queue.dequeue(TEST_LEASE).await.unwrap().unwrap();
        assert_eq!(first.task_id, "task-a");
        assert_eq!(second.task_id, "task-b");
        assert_eq!(first.delivery_count, 1);
    }

    #[tokio::test]
    async fn test_empty_queue_yields_none() {
        let queue = setup_test_queue().await;
        assert!(queue.dequeue(TEST_LEASE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_leased_job_is_invisible_until_lease_expires() {
        let queue = setup_test_queue().await;
        queue.enqueue(&"task-a".to_string()).await.unwrap();

        let lease = Duration::from_millis(50);
        let job = queue.dequeue(lease).await.unwrap().unwrap();
        assert_eq!(job.delivery_count, 1);

        // Still leased
        assert!(queue.dequeue(lease).await.unwrap().is_none());

        // Lease lapsed without an ack: the job comes back
        tokio::time::sleep(Duration::from_millis(80)).await;
        let redelivered = queue.dequeue(lease).await.unwrap().unwrap();
        assert_eq!(redelivered.id, job.id);
        assert_eq!(redelivered.delivery_count, 2);
    }

    #[tokio::test]
    async fn test_ack_retires_job() {
        let queue = setup_test_queue().await;
        queue.enqueue(&"task-a".to_string()).await.unwrap();

        let job = queue
            .dequeue(Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        queue.ack(&job).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(queue.dequeue(TEST_LEASE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nack_makes_job_deliverable_again() {
        let queue = setup_test_queue().await;
        queue.enqueue(&"task-a".to_string()).await.unwrap();

        let job = queue.dequeue(TEST_LEASE).await.unwrap().unwrap();
        queue.nack(&job).await.unwrap();

        let redelivered = queue.dequeue(TEST_LEASE).await.unwrap().unwrap();
        assert_eq!(redelivered.id, job.id);
        assert_eq!(redelivered.delivery_count, 2);
    }

    #[tokio::test]
    async fn test_nack_drops_job_after_delivery_budget() {
        let queue = setup_test_queue().await;
        queue.enqueue(&"task-a".to_string()).await.unwrap();

        let mut last_delivery = 0;
        for _ in 0..MAX_JOB_DELIVERIES {
            let job = queue.dequeue(TEST_LEASE).await.unwrap().unwrap();
            last_delivery = job.delivery_count;
            queue.nack(&job).await.unwrap();
        }
        assert_eq!(last_delivery, MAX_JOB_DELIVERIES);

        // The final nack dropped the job instead of redelivering it
        assert!(queue.dequeue(TEST_LEASE).await.unwrap().is_none());
    }
}
