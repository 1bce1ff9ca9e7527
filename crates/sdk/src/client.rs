//! Taskflow Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{RemoveTaskResponse, StatsResponse, Task, TaskEvent, TaskListResponse};
use jsonrpsee::core::client::{ClientT, Subscription, SubscriptionClientT};
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use std::time::Duration;

/// Taskflow daemon client
///
/// Talks JSON-RPC over a WebSocket so the same connection carries both
/// method calls and task event subscriptions.
///
/// # Example
///
/// ```no_run
/// use taskflow_sdk::TaskflowClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TaskflowClient::connect("ws://127.0.0.1:5000").await?;
/// # Ok(())
/// # }
/// ```
pub struct TaskflowClient {
    client: WsClient,
}

impl TaskflowClient {
    /// Connect to the Taskflow daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `ws://127.0.0.1:5000`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = WsClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .await
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Submit a new task for background processing
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskflow_sdk::TaskflowClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = TaskflowClient::connect("ws://127.0.0.1:5000").await?;
    /// let task = client.submit("Write release notes").await?;
    /// println!("Task ID: {}", task.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, title: impl Into<String>) -> Result<Task> {
        let mut params = ObjectParams::new();
        params.insert("title", title.into())?;

        let task: Task = self.client.request("task.submit.v1", params).await?;

        Ok(task)
    }

    /// List all tasks, newest first
    pub async fn list(&self) -> Result<Vec<Task>> {
        let response: TaskListResponse = self.client.request("task.list.v1", rpc_params![]).await?;

        Ok(response.tasks)
    }

    /// Fetch a single task by ID
    pub async fn get(&self, task_id: impl Into<String>) -> Result<Task> {
        let mut params = ObjectParams::new();
        params.insert("taskId", task_id.into())?;

        let task: Task = self.client.request("task.get.v1", params).await?;

        Ok(task)
    }

    /// Remove a task
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskflow_sdk::TaskflowClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = TaskflowClient::connect("ws://127.0.0.1:5000").await?;
    /// let response = client.remove("task-123").await?;
    /// assert!(response.removed);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn remove(&self, task_id: impl Into<String>) -> Result<RemoveTaskResponse> {
        let mut params = ObjectParams::new();
        params.insert("taskId", task_id.into())?;

        let response: RemoveTaskResponse = self.client.request("task.remove.v1", params).await?;

        Ok(response)
    }

    /// Fetch daemon-wide counters
    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self.client.request("admin.stats.v1", rpc_params![]).await?;

        Ok(response)
    }

    /// Subscribe to the live task event stream
    ///
    /// Events start flowing from the moment the subscription is accepted;
    /// there is no replay of earlier events.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskflow_sdk::TaskflowClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = TaskflowClient::connect("ws://127.0.0.1:5000").await?;
    /// let mut events = client.subscribe_events().await?;
    /// while let Some(event) = events.next().await {
    ///     println!("{:?}", event?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn subscribe_events(&self) -> Result<Subscription<TaskEvent>> {
        let subscription = self
            .client
            .subscribe("task.subscribe.v1", rpc_params![], "task.unsubscribe.v1")
            .await?;

        Ok(subscription)
    }
}
