//! Inbound message lifecycle and the redelivery decision.
//!
//! Each received notification runs through one cycle of
//!
//! ```text
//! Received -> Validated -> Dispatched -> Acked
//!     |           |            \-------> RejectedRequeue
//!     \-----------+--------------------> RejectedNoRequeue
//! ```
//!
//! Structural defects are dropped, orchestrator failures are requeued. A cycle
//! whose cancellation token fires before settlement ends `Abandoned`: the
//! message is neither acked nor rejected and stays with the transport.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::collaborators::{CandidateReader, EventEmitter, LoadWriter};
use crate::core::error::{AssignmentError, TransportError};
use crate::core::model::{TaskCreatedEvent, TaskId};
use crate::core::orchestrator::{AssignmentOrchestrator, AssignmentOutcome};

/// One received message awaiting settlement.
///
/// Settling consumes the delivery, so a message is acked or rejected at most once.
#[async_trait]
pub trait Delivery: Send + 'static {
    /// Transport-assigned tag.
    fn delivery_tag(&self) -> u64;
    /// Raw message body.
    fn body(&self) -> &[u8];
    /// Whether the transport delivered this message before.
    fn redelivered(&self) -> bool;
    /// Remove the message from the queue permanently.
    async fn ack(self) -> Result<(), TransportError>;
    /// Reject the message, optionally asking for redelivery.
    async fn reject(self, requeue: bool) -> Result<(), TransportError>;
}

/// A subscription yielding deliveries.
#[async_trait]
pub trait DeliverySource: Send + Sync + 'static {
    /// Delivery type produced by this source.
    type Delivery: Delivery;

    /// Wait for the next delivery; `None` once the source is closed.
    async fn recv(&self) -> Option<Self::Delivery>;
}

/// States of one delivery cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryState {
    /// Message received, not yet decoded.
    Received,
    /// Decoded and structurally valid.
    Validated,
    /// Handed to the orchestrator.
    Dispatched,
    /// Acknowledged.
    Acked,
    /// Rejected for good.
    RejectedNoRequeue,
    /// Rejected with redelivery requested.
    RejectedRequeue,
    /// Cancelled before settlement; left unsettled with the transport.
    Abandoned,
}

impl DeliveryState {
    /// Whether the cycle ends in this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Acked | Self::RejectedNoRequeue | Self::RejectedRequeue | Self::Abandoned
        )
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Dispatched => "dispatched",
            Self::Acked => "acked",
            Self::RejectedNoRequeue => "rejected_no_requeue",
            Self::RejectedRequeue => "rejected_requeue",
            Self::Abandoned => "abandoned",
        };
        f.write_str(s)
    }
}

/// Record of one completed cycle.
#[derive(Debug)]
pub struct DeliveryReport {
    /// Transport tag of the message.
    pub delivery_tag: u64,
    /// Task identifier, when the body decoded.
    pub task_id: Option<TaskId>,
    /// States visited, in order; the last one is terminal.
    pub states: Vec<DeliveryState>,
    /// Why the cycle did not ack, kind preserved for diagnostics.
    pub error: Option<AssignmentError>,
    /// Committed decision, when the orchestrator succeeded.
    pub outcome: Option<AssignmentOutcome>,
    /// Failure reported by the transport while settling.
    pub settle_error: Option<TransportError>,
}

impl DeliveryReport {
    fn new(delivery_tag: u64) -> Self {
        Self {
            delivery_tag,
            task_id: None,
            states: vec![DeliveryState::Received],
            error: None,
            outcome: None,
            settle_error: None,
        }
    }

    /// Terminal state of the cycle.
    #[must_use]
    pub fn state(&self) -> DeliveryState {
        self.states.last().copied().unwrap_or(DeliveryState::Received)
    }

    fn enter(&mut self, state: DeliveryState) {
        self.states.push(state);
    }
}

/// Decode a task-creation notification.
///
/// # Errors
///
/// Returns [`AssignmentError::MalformedInput`] when the body is not a valid message.
pub fn decode(body: &[u8]) -> Result<TaskCreatedEvent, AssignmentError> {
    serde_json::from_slice(body).map_err(|e| AssignmentError::MalformedInput(format!("undecodable body: {e}")))
}

/// Reject structural defects that redelivery cannot fix.
///
/// # Errors
///
/// Returns [`AssignmentError::MalformedInput`] naming the first defect found.
pub fn validate(event: &TaskCreatedEvent) -> Result<(), AssignmentError> {
    if event.task_id <= 0 {
        return Err(AssignmentError::MalformedInput(format!("invalid task_id: {}", event.task_id)));
    }
    if event.title.is_empty() {
        return Err(AssignmentError::MalformedInput("title cannot be empty".into()));
    }
    if !(1..=5).contains(&event.priority) {
        return Err(AssignmentError::MalformedInput(format!(
            "priority must be between 1 and 5, got: {}",
            event.priority
        )));
    }
    if event.project_id <= 0 {
        return Err(AssignmentError::MalformedInput(format!(
            "invalid project_id: {}",
            event.project_id
        )));
    }
    Ok(())
}

/// Terminal state for a failed cycle.
#[must_use]
pub const fn rejection_for(error: &AssignmentError) -> DeliveryState {
    match error {
        AssignmentError::MalformedInput(_) => DeliveryState::RejectedNoRequeue,
        _ => DeliveryState::RejectedRequeue,
    }
}

/// Runs delivery cycles against an orchestrator.
pub struct DeliveryController<R, W, E> {
    orchestrator: Arc<AssignmentOrchestrator<R, W, E>>,
}

impl<R, W, E> Clone for DeliveryController<R, W, E> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}

impl<R, W, E> DeliveryController<R, W, E>
where
    R: CandidateReader,
    W: LoadWriter,
    E: EventEmitter,
{
    /// Create a controller over a shared orchestrator.
    pub fn new(orchestrator: Arc<AssignmentOrchestrator<R, W, E>>) -> Self {
        Self { orchestrator }
    }

    /// Process one delivery to a terminal state.
    pub async fn process<D: Delivery>(&self, delivery: D, cancel: &CancellationToken) -> DeliveryReport {
        let mut report = DeliveryReport::new(delivery.delivery_tag());
        tracing::debug!(
            delivery_tag = report.delivery_tag,
            redelivered = delivery.redelivered(),
            bytes = delivery.body().len(),
            "received message"
        );

        if cancel.is_cancelled() {
            return Self::abandon(report);
        }

        let event = match decode(delivery.body()) {
            Ok(event) => event,
            Err(err) => return Self::drop_malformed(report, delivery, cancel, err).await,
        };
        report.task_id = Some(event.task_id);
        if let Err(err) = validate(&event) {
            return Self::drop_malformed(report, delivery, cancel, err).await;
        }

        report.enter(DeliveryState::Validated);

        let task = event.into_task();
        report.enter(DeliveryState::Dispatched);

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return Self::abandon(report),
            result = self.orchestrator.assign(&task) => result,
        };

        match result {
            Ok(outcome) => report.outcome = Some(outcome),
            Err(err) => {
                tracing::error!(
                    task_id = task.id,
                    error_kind = err.kind(),
                    error = %err,
                    "assignment failed, requesting redelivery"
                );
                report.error = Some(err);
            }
        }

        Self::settle(report, delivery, cancel).await
    }

    async fn drop_malformed<D: Delivery>(
        mut report: DeliveryReport,
        delivery: D,
        cancel: &CancellationToken,
        err: AssignmentError,
    ) -> DeliveryReport {
        tracing::error!(
            delivery_tag = report.delivery_tag,
            task_id = ?report.task_id,
            error_kind = err.kind(),
            error = %err,
            "dropping malformed message"
        );
        report.error = Some(err);
        Self::settle(report, delivery, cancel).await
    }

    async fn settle<D: Delivery>(
        mut report: DeliveryReport,
        delivery: D,
        cancel: &CancellationToken,
    ) -> DeliveryReport {
        if cancel.is_cancelled() {
            return Self::abandon(report);
        }

        let target = report.error.as_ref().map_or(DeliveryState::Acked, rejection_for);
        let settled = match target {
            DeliveryState::Acked => delivery.ack().await,
            DeliveryState::RejectedRequeue => delivery.reject(true).await,
            _ => delivery.reject(false).await,
        };

        if let Err(e) = settled {
            tracing::error!(
                delivery_tag = report.delivery_tag,
                state = %target,
                error = %e,
                "failed to settle message"
            );
            report.settle_error = Some(e);
        } else if target == DeliveryState::Acked {
            tracing::info!(task_id = ?report.task_id, "message processed successfully");
        }

        report.enter(target);
        report
    }

    fn abandon(mut report: DeliveryReport) -> DeliveryReport {
        tracing::warn!(
            delivery_tag = report.delivery_tag,
            task_id = ?report.task_id,
            "cancelled before settlement, leaving message for redelivery"
        );
        report.enter(DeliveryState::Abandoned);
        report
    }
}
