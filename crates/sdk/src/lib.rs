//! Taskflow SDK - Rust Client Library
//!
//! Provides a convenient client for the Taskflow daemon: task submission,
//! queries, removal and a live event subscription.
//!
//! # Example
//!
//! ```no_run
//! use taskflow_sdk::TaskflowClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to daemon
//!     let client = TaskflowClient::connect("ws://127.0.0.1:5000").await?;
//!
//!     // Watch for lifecycle events
//!     let mut events = client.subscribe_events().await?;
//!
//!     // Submit a task
//!     let task = client.submit("Index the repository").await?;
//!     println!("Task submitted: {}", task.id);
//!
//!     // First event is the creation announcement
//!     if let Some(event) = events.next().await {
//!         println!("Event: {:?}", event?);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::TaskflowClient;
pub use error::{Result, SdkError};
pub use types::{
    RemoveTaskResponse, StatsResponse, Task, TaskEvent, TaskListResponse, TaskStatus,
};
