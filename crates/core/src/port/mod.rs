// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod job_queue;
pub mod task_processor;
pub mod task_store;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use job_queue::{JobQueue, QueuedJob};
pub use task_processor::{FixedDelayProcessor, ProcessingError, TaskProcessor};
pub use task_store::TaskStore;
pub use time_provider::TimeProvider;
