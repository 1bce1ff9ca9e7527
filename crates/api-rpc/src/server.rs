//! JSON-RPC Server
//!
//! Serves the task pipeline API over HTTP and WebSocket on one port;
//! subscriptions ride the WebSocket transport.

use crate::handler::RpcHandler;
use crate::subscription::forward_task_events;
use crate::types::{GetTaskRequest, RemoveTaskRequest, SubmitTaskRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use taskflow_core::application::{NotificationHub, TaskService};
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 5000;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<TaskService>, hub: NotificationHub) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service, hub)),
        }
    }

    /// Start the JSON-RPC server.
    ///
    /// Security: binds to 127.0.0.1 by default (no external access).
    /// Returns the bound address so callers can use port 0.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server (HTTP + WebSocket)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read server address: {}", e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("task.submit.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: SubmitTaskRequest = params.parse()?;
                    handler.submit(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("task.list.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.list().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("task.get.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: GetTaskRequest = params.parse()?;
                    handler.get(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("task.remove.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: RemoveTaskRequest = params.parse()?;
                    handler.remove(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin APIs
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        // Live event stream
        let hub = self.handler.hub().clone();
        module
            .register_subscription(
                "task.subscribe.v1",
                "task.event.v1",
                "task.unsubscribe.v1",
                move |_params, pending, _ctx, _ext| {
                    let hub = hub.clone();
                    async move { forward_task_events(pending, hub.subscribe()).await }
                },
            )
            .map_err(|e| e.to_string())?;

        info!(%local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}
