// Application Layer - Use Cases and Business Logic

pub mod hub;
pub mod task_service;
pub mod worker;

// Re-exports
pub use hub::NotificationHub;
pub use task_service::TaskService;
pub use worker::{shutdown_channel, ShutdownSender, ShutdownToken, Worker};
