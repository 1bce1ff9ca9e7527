//! Notification Hub Integration Tests
//!
//! Broadcast semantics through the service: everyone hears everything
//! from the moment they subscribe, and nobody gets a replay.

use std::sync::Arc;

use taskflow_core::application::{NotificationHub, TaskService};
use taskflow_core::domain::TaskEvent;
use taskflow_core::port::id_provider::UuidProvider;
use taskflow_core::port::time_provider::SystemTimeProvider;
use taskflow_infra_sqlite::{create_pool, run_migrations, SqliteJobQueue, SqliteTaskStore};
use tokio::sync::broadcast::error::TryRecvError;

/// Every observer receives every announcement made while subscribed.
#[tokio::test]
async fn test_all_observers_hear_announcements() {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteTaskStore::new(
        pool.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
    ));
    let queue = Arc::new(SqliteJobQueue::new(pool, time_provider));
    let hub = NotificationHub::new();
    let service = TaskService::new(store, queue, hub.clone());

    let mut first = hub.subscribe();
    let mut second = hub.subscribe();
    assert_eq!(hub.observer_count(), 2);

    let task = service.submit("Broadcast check").await.unwrap();
    service.remove(&task.id).await.unwrap();

    for events in [&mut first, &mut second] {
        match events.recv().await.unwrap() {
            TaskEvent::TaskCreated { task: created } => assert_eq!(created.id, task.id),
            other => panic!("expected creation event, got {:?}", other),
        }
        match events.recv().await.unwrap() {
            TaskEvent::TaskDeleted { task_id } => assert_eq!(task_id, task.id),
            other => panic!("expected deletion event, got {:?}", other),
        }
    }

    println!("✅ Observers: both subscribers saw creation and deletion");
}

/// A subscriber that joins late sees only what happens after it joined.
#[tokio::test]
async fn test_late_observer_gets_no_replay() {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteTaskStore::new(
        pool.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
    ));
    let queue = Arc::new(SqliteJobQueue::new(pool, time_provider));
    let hub = NotificationHub::new();
    let service = TaskService::new(store, queue, hub.clone());

    let early = service.submit("Before anyone watched").await.unwrap();

    let mut events = hub.subscribe();
    let late = service.submit("After joining").await.unwrap();

    match events.recv().await.unwrap() {
        TaskEvent::TaskCreated { task: created } => {
            assert_eq!(created.id, late.id);
            assert_ne!(created.id, early.id);
        }
        other => panic!("expected creation event, got {:?}", other),
    }
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

/// One observer going away does not stop delivery to the rest, and
/// publishing with no observers at all is not an error.
#[tokio::test]
async fn test_dropped_observer_does_not_block_others() {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteTaskStore::new(
        pool.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
    ));
    let queue = Arc::new(SqliteJobQueue::new(pool, time_provider));
    let hub = NotificationHub::new();
    let service = TaskService::new(store, queue, hub.clone());

    let leaver = hub.subscribe();
    let mut stayer = hub.subscribe();
    drop(leaver);
    assert_eq!(hub.observer_count(), 1);

    let task = service.submit("Still broadcast").await.unwrap();
    match stayer.recv().await.unwrap() {
        TaskEvent::TaskCreated { task: created } => assert_eq!(created.id, task.id),
        other => panic!("expected creation event, got {:?}", other),
    }

    // No observers left: submissions still succeed silently
    drop(stayer);
    assert_eq!(hub.observer_count(), 0);
    let quiet = service.submit("Into the void").await.unwrap();
    assert_eq!(
        service.get(&quiet.id).await.unwrap().id,
        quiet.id
    );

    println!("✅ Observers: drops tolerated, silence tolerated");
}
