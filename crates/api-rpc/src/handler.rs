//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{code, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    GetTaskRequest, RemoveTaskRequest, RemoveTaskResponse, StatsResponse, SubmitTaskRequest,
    TaskListResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use taskflow_core::application::{NotificationHub, TaskService};
use taskflow_core::domain::{Task, TaskStatus};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<TaskService>,
    hub: NotificationHub,
    rate_limiter: Arc<RateLimiter>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<TaskService>, hub: NotificationHub) -> Self {
        // Default: 200 burst, 100 req/sec (configurable via env)
        let max_burst: u32 = std::env::var("TASKFLOW_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        let rate_per_sec: u32 = std::env::var("TASKFLOW_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            service,
            hub,
            rate_limiter: Arc::new(RateLimiter::new(max_burst, rate_per_sec)),
            start_time: std::time::Instant::now(),
        }
    }

    /// The hub backing `task.subscribe.v1`
    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    fn throttle(&self) -> ErrorObjectOwned {
        ErrorObjectOwned::owned(
            code::THROTTLED,
            "Rate limit exceeded. Please slow down.",
            None::<()>,
        )
    }

    /// task.submit.v1
    pub async fn submit(&self, params: SubmitTaskRequest) -> Result<Task, ErrorObjectOwned> {
        // Rate limiting check (flood protection)
        if !self.rate_limiter.check().await {
            return Err(self.throttle());
        }

        self.service.submit(&params.title).await.map_err(to_rpc_error)
    }

    /// task.list.v1
    pub async fn list(&self) -> Result<TaskListResponse, ErrorObjectOwned> {
        let tasks = self.service.list().await.map_err(to_rpc_error)?;
        Ok(TaskListResponse { tasks })
    }

    /// task.get.v1
    pub async fn get(&self, params: GetTaskRequest) -> Result<Task, ErrorObjectOwned> {
        self.service.get(&params.task_id).await.map_err(to_rpc_error)
    }

    /// task.remove.v1
    pub async fn remove(
        &self,
        params: RemoveTaskRequest,
    ) -> Result<RemoveTaskResponse, ErrorObjectOwned> {
        // Rate limiting check (flood protection)
        if !self.rate_limiter.check().await {
            return Err(self.throttle());
        }

        self.service
            .remove(&params.task_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(RemoveTaskResponse {
            task_id: params.task_id,
            removed: true,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let tasks = self.service.list().await.map_err(to_rpc_error)?;

        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count() as i64;

        Ok(StatsResponse {
            total_tasks: tasks.len() as i64,
            pending_tasks: count(TaskStatus::Pending),
            processing_tasks: count(TaskStatus::Processing),
            completed_tasks: count(TaskStatus::Completed),
            failed_tasks: count(TaskStatus::Failed),
            observers: self.hub.observer_count() as i64,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}
