//! In-memory candidate store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{BackendError, Candidate, CandidateId, CandidateReader, LoadWriter};

/// Candidate store keyed by id; eligible snapshots come back in id order.
#[derive(Default)]
pub struct InMemoryCandidatePool {
    candidates: Mutex<BTreeMap<CandidateId, Candidate>>,
}

impl InMemoryCandidatePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool seeded with `candidates`; later duplicates replace earlier ones.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let pool = Self::new();
        for candidate in candidates {
            pool.upsert(candidate);
        }
        pool
    }

    /// Insert or replace a candidate record.
    pub fn upsert(&self, candidate: Candidate) {
        self.candidates.lock().insert(candidate.id, candidate);
    }

    /// Soft-delete a candidate. Returns false for unknown ids.
    pub fn soft_delete(&self, id: CandidateId) -> bool {
        self.candidates
            .lock()
            .get_mut(&id)
            .map(|c| c.deleted_at = Some(chrono::Utc::now()))
            .is_some()
    }

    /// Current record for `id`, deleted or not.
    pub fn get(&self, id: CandidateId) -> Option<Candidate> {
        self.candidates.lock().get(&id).cloned()
    }

    /// Number of stored records, eligible or not.
    pub fn len(&self) -> usize {
        self.candidates.lock().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.candidates.lock().is_empty()
    }
}

#[async_trait]
impl CandidateReader for InMemoryCandidatePool {
    async fn fetch_eligible(&self) -> Result<Vec<Candidate>, BackendError> {
        Ok(self
            .candidates
            .lock()
            .values()
            .filter(|c| c.is_eligible())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LoadWriter for InMemoryCandidatePool {
    async fn increment_load(&self, candidate_id: CandidateId, delta: u32) -> Result<(), BackendError> {
        let mut candidates = self.candidates.lock();
        let candidate = candidates
            .get_mut(&candidate_id)
            .filter(|c| c.deleted_at.is_none())
            .ok_or(BackendError::CandidateNotFound(candidate_id))?;
        candidate.current_load = candidate.current_load.saturating_add(delta);
        Ok(())
    }
}
