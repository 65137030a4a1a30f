//! In-memory event emitter.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{BackendError, EventEmitter, TaskAssignedEvent, TaskId};

/// Collects published events in publish order.
#[derive(Default)]
pub struct InMemoryEventEmitter {
    events: Mutex<Vec<TaskAssignedEvent>>,
}

impl InMemoryEventEmitter {
    /// Create an empty emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every published event.
    pub fn events(&self) -> Vec<TaskAssignedEvent> {
        self.events.lock().clone()
    }

    /// Events published for one task; more than one means it was redelivered.
    pub fn events_for(&self, task_id: TaskId) -> Vec<TaskAssignedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventEmitter for InMemoryEventEmitter {
    async fn publish_assigned(&self, event: &TaskAssignedEvent) -> Result<(), BackendError> {
        self.events.lock().push(event.clone());
        tracing::info!(
            task_id = event.task_id,
            assignee_id = event.assignee_id,
            score = event.score,
            "published task assigned event"
        );
        Ok(())
    }
}
