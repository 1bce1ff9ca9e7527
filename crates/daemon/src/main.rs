//! Taskflow Daemon - Main Entry Point
//! Store, queue, worker and RPC surface composed into one process

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use taskflow_api_rpc::{RpcServer, RpcServerConfig};
use taskflow_core::application::worker::constants::DEFAULT_PROCESSING_DELAY;
use taskflow_core::application::worker::{shutdown_channel, Worker};
use taskflow_core::application::{NotificationHub, TaskService};
use taskflow_core::port::id_provider::UuidProvider;
use taskflow_core::port::time_provider::SystemTimeProvider;
use taskflow_core::port::FixedDelayProcessor;
use taskflow_infra_sqlite::{create_pool, run_migrations, SqliteJobQueue, SqliteTaskStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.taskflow/tasks.db";
const DEFAULT_RPC_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("TASKFLOW_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("taskflow=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Taskflow daemon v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("TASKFLOW_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    // The queue may live in its own database file; by default it shares
    // the store's.
    let queue_db_path = std::env::var("TASKFLOW_QUEUE_DB_PATH").unwrap_or_else(|_| db_path.clone());

    let rpc_port: u16 = std::env::var("TASKFLOW_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RPC_PORT);

    let processing_delay = std::env::var("TASKFLOW_PROCESSING_DELAY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PROCESSING_DELAY);

    info!(db_path = %db_path, "Initializing task store...");

    // 3. Initialize databases
    let store_pool = create_pool(&db_path).await?;
    run_migrations(&store_pool).await?;

    let queue_pool = if queue_db_path == db_path {
        store_pool.clone()
    } else {
        info!(queue_db_path = %queue_db_path, "Initializing separate queue database...");
        let pool = create_pool(&queue_db_path).await?;
        run_migrations(&pool).await?;
        pool
    };

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let store = Arc::new(SqliteTaskStore::new(
        store_pool,
        id_provider.clone(),
        time_provider.clone(),
    ));
    let queue = Arc::new(SqliteJobQueue::new(queue_pool, time_provider.clone()));
    let hub = NotificationHub::new();

    let service = Arc::new(TaskService::new(
        store.clone(),
        queue.clone(),
        hub.clone(),
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, service.clone(), hub.clone());
    let (rpc_addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start Worker (task processing loop)
    info!("Starting worker...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let processor = Arc::new(FixedDelayProcessor::new(
        processing_delay,
        time_provider.clone(),
    ));
    let worker = Worker::new(
        store.clone(),
        queue.clone(),
        processor,
        hub.clone(),
        time_provider.clone(),
    );

    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker.run(shutdown_rx).await {
            tracing::error!(error = ?e, "Worker failed");
        }
    });

    info!(%rpc_addr, "System ready. Waiting for tasks...");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), worker_handle).await;

    info!("Shutdown complete.");

    Ok(())
}
