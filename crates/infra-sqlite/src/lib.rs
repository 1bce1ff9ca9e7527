// Taskflow Infrastructure - SQLite Adapters
// Implements: TaskStore (durable records), JobQueue (leased handoff)

mod connection;
mod job_queue;
mod migration;
mod sqlx_error;
mod task_store;

pub use connection::create_pool;
pub use job_queue::SqliteJobQueue;
pub use migration::run_migrations;
pub use task_store::SqliteTaskStore;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
