//! Tests for error types

use task_optimizer::core::{AssignmentError, BackendError, ConfigError, TransportError};

#[test]
fn test_malformed_input_error() {
    let err = AssignmentError::MalformedInput("title cannot be empty".to_string());
    assert_eq!(format!("{}", err), "malformed input: title cannot be empty");
    assert_eq!(err.kind(), "malformed_input");
    assert!(!err.is_retryable());
}

#[test]
fn test_no_eligible_candidates_error() {
    let err = AssignmentError::NoEligibleCandidates;
    assert_eq!(format!("{}", err), "no eligible candidates");
    assert!(err.is_retryable());
}

#[test]
fn test_load_update_error() {
    let err = AssignmentError::LoadUpdateFailed {
        candidate_id: 7,
        reason: "connection reset".to_string(),
    };
    assert_eq!(format!("{}", err), "load update failed for candidate 7: connection reset");
    assert_eq!(err.kind(), "load_update_failed");
    assert!(!err.is_retryable());
}

#[test]
fn test_retryable_kinds() {
    assert!(AssignmentError::CandidateFetchFailed("down".into()).is_retryable());
    assert!(AssignmentError::EventPublishFailed("down".into()).is_retryable());
}

#[test]
fn test_backend_error() {
    let err = BackendError::Unavailable("connection failed".to_string());
    assert_eq!(format!("{}", err), "backend unavailable: connection failed");
    assert_eq!(format!("{}", BackendError::CandidateNotFound(3)), "candidate not found: 3");
}

#[test]
fn test_transport_error() {
    assert_eq!(format!("{}", TransportError::ChannelClosed), "channel closed");
    assert_eq!(format!("{}", TransportError::UnknownDeliveryTag(9)), "unknown delivery tag: 9");
}

#[test]
fn test_config_error() {
    let err = ConfigError::Parse {
        key: "WORKER_COUNT".to_string(),
        reason: "invalid digit found in string".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "parse error for `WORKER_COUNT`: invalid digit found in string"
    );
}
