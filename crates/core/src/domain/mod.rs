// Domain Layer - Pure business logic and entities

pub mod error;
pub mod event;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use event::TaskEvent;
pub use task::{Task, TaskId, TaskPatch, TaskStatus};
