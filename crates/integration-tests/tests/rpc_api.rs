//! JSON-RPC End-to-End Tests
//!
//! Boots the real server on an ephemeral port and drives it with the SDK
//! client over WebSocket, worker included.

use std::sync::Arc;
use std::time::Duration;

use taskflow_api_rpc::{RpcServer, RpcServerConfig};
use taskflow_core::application::{shutdown_channel, NotificationHub, TaskService, Worker};
use taskflow_core::port::id_provider::UuidProvider;
use taskflow_core::port::time_provider::SystemTimeProvider;
use taskflow_core::port::FixedDelayProcessor;
use taskflow_infra_sqlite::{create_pool, run_migrations, SqliteJobQueue, SqliteTaskStore};
use taskflow_sdk::{TaskEvent, TaskStatus, TaskflowClient};

/// The whole surface in one journey: subscribe, submit, watch the worker
/// finish the task, query it, remove it, and see the removal announced.
#[tokio::test]
async fn test_full_task_journey_over_websocket() {
    let db_path = "/tmp/taskflow_test_rpc_e2e.db";
    let _ = std::fs::remove_file(db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));

    // 1. Wire the daemon pieces by hand on an ephemeral port
    let pool = create_pool(db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteTaskStore::new(
        pool.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
    ));
    let queue = Arc::new(SqliteJobQueue::new(pool, time_provider.clone()));
    let hub = NotificationHub::new();
    let service = Arc::new(TaskService::new(store.clone(), queue.clone(), hub.clone()));

    let config = RpcServerConfig {
        port: 0,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(config, service.clone(), hub.clone());
    let (addr, rpc_handle) = rpc_server.start().await.unwrap();

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let worker = Worker::new(
        store.clone(),
        queue.clone(),
        Arc::new(FixedDelayProcessor::new(
            Duration::from_millis(25),
            time_provider.clone(),
        )),
        hub.clone(),
        time_provider,
    );
    let worker_handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    // 2. Connect and open the event stream before submitting
    let client = TaskflowClient::connect(format!("ws://{}", addr))
        .await
        .unwrap();
    let mut events = client.subscribe_events().await.unwrap();

    // 3. Submit
    let task = client.submit("End-to-end task").await.unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.processed_at.is_none());

    // 4. Watch the lifecycle play out on the subscription
    let mut saw_created = false;
    let mut saw_processing = false;
    let mut completion_result: Option<String> = None;
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = events.next().await {
            match event.unwrap() {
                TaskEvent::TaskCreated { task: created } => {
                    assert_eq!(created.id, task.id);
                    saw_created = true;
                }
                TaskEvent::TaskUpdated {
                    task_id,
                    status,
                    result,
                    ..
                } => {
                    assert_eq!(task_id, task.id);
                    match status {
                        TaskStatus::Processing => saw_processing = true,
                        TaskStatus::Completed => {
                            completion_result = result;
                            break;
                        }
                        other => panic!("unexpected status announcement: {:?}", other),
                    }
                }
                TaskEvent::TaskDeleted { .. } => panic!("nothing was deleted yet"),
            }
        }
    })
    .await
    .expect("lifecycle events did not arrive in time");

    assert!(saw_created);
    assert!(saw_processing);
    let result = completion_result.expect("completion carried no result");
    assert!(result.starts_with(&format!("Task {} processed at ", task.id)));
    assert!(result.ends_with('Z'));

    // 5. Queries agree with the events
    let fetched = client.get(&task.id).await.unwrap();
    assert_eq!(fetched.status, TaskStatus::Completed);
    assert_eq!(fetched.result, result);
    assert!(fetched.processed_at.is_some());

    let tasks = client.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_tasks, 1);
    assert_eq!(stats.completed_tasks, 1);
    assert!(stats.observers >= 1);
    assert!(stats.uptime_seconds >= 0);

    // 6. Remove and hear about it
    let removal = client.remove(&task.id).await.unwrap();
    assert!(removal.removed);
    assert_eq!(removal.task_id, task.id);

    let deleted = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("deletion event did not arrive")
        .unwrap()
        .unwrap();
    match deleted {
        TaskEvent::TaskDeleted { task_id } => assert_eq!(task_id, task.id),
        other => panic!("expected deletion event, got {:?}", other),
    }

    let missing = client.get(&task.id).await.unwrap_err();
    assert_eq!(missing.call_code(), Some(4001));

    // 7. Tear down
    shutdown_tx.shutdown();
    rpc_handle.stop().unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(2), worker_handle).await;

    let _ = std::fs::remove_file(db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));

    println!("✅ RPC e2e: submit, process, query, remove all observed over one socket");
}

/// Error mapping over the wire: validation and unknown IDs come back with
/// their dedicated codes.
#[tokio::test]
async fn test_error_codes_over_websocket() {
    let db_path = "/tmp/taskflow_test_rpc_errors.db";
    let _ = std::fs::remove_file(db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));

    let pool = create_pool(db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteTaskStore::new(
        pool.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
    ));
    let queue = Arc::new(SqliteJobQueue::new(pool, time_provider));
    let hub = NotificationHub::new();
    let service = Arc::new(TaskService::new(store, queue, hub.clone()));

    let config = RpcServerConfig {
        port: 0,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(config, service, hub);
    let (addr, rpc_handle) = rpc_server.start().await.unwrap();

    let client = TaskflowClient::connect(format!("ws://{}", addr))
        .await
        .unwrap();

    // Blank title is a validation error
    let err = client.submit("   ").await.unwrap_err();
    assert_eq!(err.call_code(), Some(4000));

    // Unknown IDs are not-found on both read and remove
    let err = client.get("no-such-task").await.unwrap_err();
    assert_eq!(err.call_code(), Some(4001));

    let err = client.remove("no-such-task").await.unwrap_err();
    assert_eq!(err.call_code(), Some(4001));

    // The failed calls left nothing behind
    assert!(client.list().await.unwrap().is_empty());
    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_tasks, 0);

    rpc_handle.stop().unwrap();

    let _ = std::fs::remove_file(db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));
}
