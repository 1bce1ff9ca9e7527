// Notification Hub - Event fan-out to live observers

use tokio::sync::broadcast;

use crate::domain::TaskEvent;

/// Events buffered per subscriber before the oldest are dropped
const HUB_CAPACITY: usize = 256;

/// Broadcast hub for task lifecycle events.
///
/// Purely in-memory: events reach the observers attached at publish time
/// and are gone afterwards. There is no replay and no persistence; the
/// store stays the source of truth.
#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<TaskEvent>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);
        Self { sender }
    }

    /// Attach an observer. It sees only events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to every currently attached observer.
    pub fn publish(&self, event: TaskEvent) {
        // send() errors only when no observer is attached; publishing into
        // silence is not a failure.
        let _ = self.sender.send(event);
    }

    /// Number of currently attached observers
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use chrono::Utc;

    #[test]
    fn publish_without_observers_is_silent() {
        let hub = NotificationHub::new();
        hub.publish(TaskEvent::deleted("t-1".into()));
        assert_eq!(hub.observer_count(), 0);
    }

    #[tokio::test]
    async fn all_observers_receive_each_event() {
        let hub = NotificationHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.publish(TaskEvent::created(Task::new("t-1", "scan", Utc::now())));

        for rx in [&mut first, &mut second] {
            match rx.recv().await.unwrap() {
                TaskEvent::TaskCreated { task } => assert_eq!(task.id, "t-1"),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn late_observer_misses_earlier_events() {
        let hub = NotificationHub::new();
        hub.publish(TaskEvent::deleted("t-1".into()));

        let mut late = hub.subscribe();
        hub.publish(TaskEvent::deleted("t-2".into()));

        match late.recv().await.unwrap() {
            TaskEvent::TaskDeleted { task_id } => assert_eq!(task_id, "t-2"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(late.try_recv().is_err());
    }
}
