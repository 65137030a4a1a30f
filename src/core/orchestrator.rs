//! End-to-end commit of one assignment decision.
//!
//! Steps run strictly in order: fetch the pool, score it, increment the
//! winner's load, publish the event. A failed load increment is reported and
//! audited but never stops the publish; a failed publish fails the decision.

use std::sync::Arc;

use chrono::Utc;

use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::collaborators::{CandidateReader, EventEmitter, LoadWriter};
use crate::core::error::AssignmentError;
use crate::core::model::{AssignmentResult, CandidateId, Task, TaskAssignedEvent};
use crate::core::scoring;

/// Outcome of the load increment step.
#[derive(Debug)]
pub enum LoadUpdate {
    /// Counter incremented.
    Applied,
    /// Counter not incremented; always a [`AssignmentError::LoadUpdateFailed`].
    Failed(AssignmentError),
}

impl LoadUpdate {
    /// Whether the increment went through.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A committed decision.
#[derive(Debug)]
pub struct AssignmentOutcome {
    /// Winning candidate and its scores.
    pub result: AssignmentResult,
    /// The event that was published.
    pub event: TaskAssignedEvent,
    /// What happened to the load counter.
    pub load_update: LoadUpdate,
}

/// Drives one task through fetch, score, load increment and publish.
pub struct AssignmentOrchestrator<R, W, E> {
    reader: R,
    writer: W,
    emitter: E,
    audit: Option<Arc<dyn AuditSink>>,
}

impl<R, W, E> AssignmentOrchestrator<R, W, E>
where
    R: CandidateReader,
    W: LoadWriter,
    E: EventEmitter,
{
    /// Create an orchestrator from its collaborators.
    pub fn new(reader: R, writer: W, emitter: E) -> Self {
        Self {
            reader,
            writer,
            emitter,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Execute the full decision commit for `task`.
    ///
    /// # Errors
    ///
    /// - [`AssignmentError::CandidateFetchFailed`] when the pool cannot be read.
    /// - [`AssignmentError::NoEligibleCandidates`] when the pool is empty.
    /// - [`AssignmentError::EventPublishFailed`] when the event cannot be published.
    ///
    /// A load increment failure is never returned here; it is carried in
    /// [`AssignmentOutcome::load_update`].
    pub async fn assign(&self, task: &Task) -> Result<AssignmentOutcome, AssignmentError> {
        tracing::info!(
            task_id = task.id,
            title = %task.title,
            priority = task.priority,
            skills = ?task.skills,
            "starting task assignment"
        );

        let candidates = match self.reader.fetch_eligible().await {
            Ok(candidates) => candidates,
            Err(e) => {
                let err = AssignmentError::CandidateFetchFailed(e.to_string());
                tracing::error!(task_id = task.id, error = %err, "failed to fetch candidates");
                self.record(task, None, AuditAction::FetchFailed, Some(err.to_string()));
                return Err(err);
            }
        };

        let result = match scoring::select_best(task, &candidates) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(task_id = task.id, error = %err, "no assignee available");
                self.record(task, None, AuditAction::NoCandidates, None);
                return Err(err);
            }
        };

        tracing::info!(
            task_id = task.id,
            candidate_id = result.candidate_id,
            candidate_name = %result.candidate_name,
            score = result.total_score,
            reason = %result.rationale,
            "found best assignee"
        );

        let load_update = match self.writer.increment_load(result.candidate_id, 1).await {
            Ok(()) => LoadUpdate::Applied,
            Err(e) => {
                let err = AssignmentError::LoadUpdateFailed {
                    candidate_id: result.candidate_id,
                    reason: e.to_string(),
                };
                tracing::error!(
                    task_id = task.id,
                    candidate_id = result.candidate_id,
                    error_kind = err.kind(),
                    error = %err,
                    "failed to update candidate load, continuing"
                );
                self.record(
                    task,
                    Some(result.candidate_id),
                    AuditAction::LoadUpdateFailed,
                    Some(err.to_string()),
                );
                LoadUpdate::Failed(err)
            }
        };

        let event = TaskAssignedEvent::from_result(task.id, &result, Utc::now());
        if let Err(e) = self.emitter.publish_assigned(&event).await {
            let err = AssignmentError::EventPublishFailed(e.to_string());
            tracing::error!(task_id = task.id, error = %err, "failed to publish assigned event");
            self.record(
                task,
                Some(result.candidate_id),
                AuditAction::PublishFailed,
                Some(err.to_string()),
            );
            return Err(err);
        }

        self.record(
            task,
            Some(result.candidate_id),
            AuditAction::Assigned,
            Some(result.rationale.clone()),
        );
        tracing::info!(
            task_id = task.id,
            assignee_id = result.candidate_id,
            "task assignment completed"
        );

        Ok(AssignmentOutcome {
            result,
            event,
            load_update,
        })
    }

    fn record(
        &self,
        task: &Task,
        candidate_id: Option<CandidateId>,
        action: AuditAction,
        detail: Option<String>,
    ) {
        if let Some(sink) = &self.audit {
            sink.record(build_audit_event(task.id, candidate_id, action, detail));
        }
    }
}
