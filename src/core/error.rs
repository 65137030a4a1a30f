//! Error types for assignment, collaborator, and transport operations.

use thiserror::Error;

use crate::core::model::CandidateId;

/// Failure kinds of one assignment decision cycle.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Inbound notification could not be decoded or failed validation.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The eligible candidate pool was empty.
    #[error("no eligible candidates")]
    NoEligibleCandidates,
    /// Reading the candidate pool snapshot failed.
    #[error("candidate fetch failed: {0}")]
    CandidateFetchFailed(String),
    /// Incrementing the winner's load counter failed.
    #[error("load update failed for candidate {candidate_id}: {reason}")]
    LoadUpdateFailed {
        /// Candidate whose counter was not incremented.
        candidate_id: CandidateId,
        /// Backend failure description.
        reason: String,
    },
    /// Publishing the assigned event failed.
    #[error("event publish failed: {0}")]
    EventPublishFailed(String),
}

impl AssignmentError {
    /// Whether redelivering the originating message may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NoEligibleCandidates | Self::CandidateFetchFailed(_) | Self::EventPublishFailed(_)
        )
    }

    /// Stable label used as the `error_kind` log and audit field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::NoEligibleCandidates => "no_eligible_candidates",
            Self::CandidateFetchFailed(_) => "candidate_fetch_failed",
            Self::LoadUpdateFailed { .. } => "load_update_failed",
            Self::EventPublishFailed(_) => "event_publish_failed",
        }
    }
}

/// Errors returned by external collaborators (candidate store, event emitter).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend could not serve the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// Referenced candidate does not exist in the store.
    #[error("candidate not found: {0}")]
    CandidateNotFound(CandidateId),
    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors settling an inbound delivery with the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The channel the delivery arrived on is gone.
    #[error("channel closed")]
    ChannelClosed,
    /// The transport no longer tracks this delivery.
    #[error("unknown delivery tag: {0}")]
    UnknownDeliveryTag(u64),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// A raw value could not be parsed.
    #[error("parse error for `{key}`: {reason}")]
    Parse {
        /// Offending key.
        key: String,
        /// Parser message.
        reason: String,
    },
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
