// Task Lifecycle Events
//
// Events are fire-and-forget notifications published through the hub to
// whoever is subscribed at that moment. They are not persisted and never
// replayed; the store remains the source of truth.

use serde::{Deserialize, Serialize};

use crate::domain::task::{Task, TaskId, TaskStatus};

/// A lifecycle event as it crosses the notification hub.
///
/// There is no failure event: a failed unit of work is re-signaled to
/// the queue, not announced to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TaskEvent {
    /// A task record was accepted and persisted
    #[serde(rename_all = "camelCase")]
    TaskCreated { task: Task },

    /// The worker advanced a task's status
    #[serde(rename_all = "camelCase")]
    TaskUpdated {
        task_id: TaskId,
        status: TaskStatus,
        /// Present only on completion
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
        /// Full record snapshot, carried on completion
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task: Option<Task>,
    },

    /// A task record was removed
    #[serde(rename_all = "camelCase")]
    TaskDeleted { task_id: TaskId },
}

impl TaskEvent {
    pub fn created(task: Task) -> Self {
        TaskEvent::TaskCreated { task }
    }

    /// The pending -> processing announcement: status only
    pub fn processing(task_id: TaskId) -> Self {
        TaskEvent::TaskUpdated {
            task_id,
            status: TaskStatus::Processing,
            result: None,
            task: None,
        }
    }

    /// The processing -> completed announcement, with result and snapshot
    pub fn completed(task: Task) -> Self {
        TaskEvent::TaskUpdated {
            task_id: task.id.clone(),
            status: TaskStatus::Completed,
            result: Some(task.result.clone()),
            task: Some(task),
        }
    }

    pub fn deleted(task_id: TaskId) -> Self {
        TaskEvent::TaskDeleted { task_id }
    }
}
