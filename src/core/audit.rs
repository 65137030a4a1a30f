//! Audit trail of assignment decisions.
//!
//! Every decision cycle that reaches the orchestrator leaves one audit event,
//! including the ones whose failure is otherwise swallowed (load updates).

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::core::model::{CandidateId, TaskId};

/// What happened to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Event published; decision complete.
    Assigned,
    /// Load counter not incremented; the decision continued.
    LoadUpdateFailed,
    /// Decision made but the event never went out.
    PublishFailed,
    /// Pool was empty.
    NoCandidates,
    /// Pool could not be read.
    FetchFailed,
}

impl AuditAction {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::LoadUpdateFailed => "load_update_failed",
            Self::PublishFailed => "publish_failed",
            Self::NoCandidates => "no_candidates",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related task identifier.
    pub task_id: TaskId,
    /// Chosen candidate, once one was selected.
    pub candidate_id: Option<CandidateId>,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// Bounded in-memory audit sink; the oldest events are dropped first.
pub struct InMemoryAuditSink {
    events: Mutex<VecDeque<AuditEvent>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Events recorded for one task, oldest first.
    pub fn events_for(&self, task_id: TaskId) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event stamped now with a fresh id.
pub fn build_audit_event(
    task_id: TaskId,
    candidate_id: Option<CandidateId>,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        task_id,
        candidate_id,
        action,
        created_at: Utc::now(),
        detail,
    }
}
