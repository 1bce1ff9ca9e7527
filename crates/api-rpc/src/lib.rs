//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 surface of the Taskflow pipeline: request
//! methods plus the task event subscription.

pub mod error;
pub mod handler;
mod rate_limiter;
pub mod server;
pub mod subscription;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
