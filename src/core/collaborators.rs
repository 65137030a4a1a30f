//! Contracts of the external collaborators the engine depends on.
//!
//! The orchestrator never owns storage or a broker connection. Implementations
//! are handed in at construction time and shared behind `Arc` by the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::BackendError;
use crate::core::model::{Candidate, CandidateId, TaskAssignedEvent};

/// Read side of the candidate pool.
#[async_trait]
pub trait CandidateReader: Send + Sync + 'static {
    /// Return assignable, non-deleted candidates.
    ///
    /// Order is significant: it breaks scoring ties and must be stable
    /// across calls while the underlying data is unchanged.
    async fn fetch_eligible(&self) -> Result<Vec<Candidate>, BackendError>;
}

/// Write side of the candidate pool.
#[async_trait]
pub trait LoadWriter: Send + Sync + 'static {
    /// Add `delta` to the candidate's open work counter inside the store.
    async fn increment_load(&self, candidate_id: CandidateId, delta: u32) -> Result<(), BackendError>;
}

/// Publisher of assignment decisions.
#[async_trait]
pub trait EventEmitter: Send + Sync + 'static {
    /// Publish an assigned event. `Ok` means the event is out of our hands.
    async fn publish_assigned(&self, event: &TaskAssignedEvent) -> Result<(), BackendError>;
}

#[async_trait]
impl<T: CandidateReader + ?Sized> CandidateReader for Arc<T> {
    async fn fetch_eligible(&self) -> Result<Vec<Candidate>, BackendError> {
        (**self).fetch_eligible().await
    }
}

#[async_trait]
impl<T: LoadWriter + ?Sized> LoadWriter for Arc<T> {
    async fn increment_load(&self, candidate_id: CandidateId, delta: u32) -> Result<(), BackendError> {
        (**self).increment_load(candidate_id, delta).await
    }
}

#[async_trait]
impl<T: EventEmitter + ?Sized> EventEmitter for Arc<T> {
    async fn publish_assigned(&self, event: &TaskAssignedEvent) -> Result<(), BackendError> {
        (**self).publish_assigned(event).await
    }
}
