//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results. Field names follow
//! the wire convention of the task records themselves (camelCase).

use serde::{Deserialize, Serialize};
use taskflow_core::domain::Task;

/// task.submit.v1 - Submit a new task
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskRequest {
    pub title: String,
}

/// task.list.v1 - List all tasks (no parameters)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// task.get.v1 - Fetch one task
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTaskRequest {
    pub task_id: String,
}

/// task.remove.v1 - Remove a task
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTaskRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTaskResponse {
    pub task_id: String,
    pub removed: bool,
}

/// admin.stats.v1 - Pipeline statistics (no parameters)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_tasks: i64,
    pub pending_tasks: i64,
    pub processing_tasks: i64,
    pub completed_tasks: i64,
    pub failed_tasks: i64,
    pub observers: i64,
    pub uptime_seconds: i64,
}
