//! Assignment decision engine: scoring, orchestration, and delivery control.

pub mod audit;
pub mod collaborators;
pub mod delivery;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod scoring;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use collaborators::{CandidateReader, EventEmitter, LoadWriter};
pub use delivery::{Delivery, DeliveryController, DeliveryReport, DeliverySource, DeliveryState};
pub use error::{AppResult, AssignmentError, BackendError, ConfigError, TransportError};
pub use model::{
    AssignmentResult, Candidate, CandidateId, ProjectId, Role, Task, TaskAssignedEvent,
    TaskCreatedEvent, TaskId,
};
pub use orchestrator::{AssignmentOrchestrator, AssignmentOutcome, LoadUpdate};
