// SQLite TaskStore Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use taskflow_core::domain::{Task, TaskId, TaskPatch, TaskStatus};
use taskflow_core::error::{AppError, Result};
use taskflow_core::port::{IdProvider, TaskStore, TimeProvider};

use crate::sqlx_error;

fn map_sqlx_error(err: sqlx::Error) -> AppError {
    AppError::Store(sqlx_error::describe(&err))
}

pub struct SqliteTaskStore {
    pool: SqlitePool,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteTaskStore {
    pub fn new(
        pool: SqlitePool,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            pool,
            id_provider,
            time_provider,
        }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create(&self, title: &str) -> Result<Task> {
        let task = Task::new(
            self.id_provider.generate_id(),
            title,
            self.time_provider.now(),
        );

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, status, result, created_at, processed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(task.status.to_string())
        .bind(&task.result)
        .bind(task.created_at)
        .bind(task.processed_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(task)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        // NULL patch fields keep the stored value. Update-then-return in one
        // statement so a concurrent delete surfaces as NotFound, never as an
        // upsert.
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET status = COALESCE(?, status),
                result = COALESCE(?, result),
                processed_at = COALESCE(?, processed_at)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.status.map(|s| s.to_string()))
        .bind(patch.result)
        .bind(patch.processed_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => row.into_task(),
            None => Err(AppError::NotFound(format!("Task not found: {}", id))),
        }
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task not found: {}", id)));
        }
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    status: String,
    result: String,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        // Status text this code never wrote means the row is corrupt;
        // surface it rather than inventing a state.
        let status: TaskStatus = self.status.parse()?;

        Ok(Task {
            id: self.id,
            title: self.title,
            status,
            result: self.result,
            created_at: self.created_at,
            processed_at: self.processed_at,
        })
    }
}
