//! Tests for message decoding and the settlement decision

use task_optimizer::core::delivery::{decode, rejection_for, validate};
use task_optimizer::core::{AssignmentError, DeliveryState};

fn body(task_id: i64, title: &str, priority: i32, project_id: i64) -> String {
    format!(
        r#"{{"task_id":{task_id},"title":"{title}","description":"","priority":{priority},"project_id":{project_id},"skills":["go"],"created_at":"2024-01-15T10:00:00Z"}}"#
    )
}

#[test]
fn test_decode_valid_message() {
    let event = decode(body(1, "Fix login", 3, 2).as_bytes()).unwrap();
    assert_eq!(event.task_id, 1);
    assert_eq!(event.skills, vec!["go".to_string()]);
    assert!(validate(&event).is_ok());
}

#[test]
fn test_decode_garbage() {
    let err = decode(b"not json").unwrap_err();
    assert!(matches!(err, AssignmentError::MalformedInput(_)));
}

#[test]
fn test_validate_order() {
    let event = decode(body(0, "", 9, 0).as_bytes()).unwrap();
    let err = validate(&event).unwrap_err();
    assert_eq!(err.to_string(), "malformed input: invalid task_id: 0");

    let event = decode(body(1, "", 9, 0).as_bytes()).unwrap();
    assert_eq!(validate(&event).unwrap_err().to_string(), "malformed input: title cannot be empty");

    let event = decode(body(1, "t", 9, 0).as_bytes()).unwrap();
    assert_eq!(
        validate(&event).unwrap_err().to_string(),
        "malformed input: priority must be between 1 and 5, got: 9"
    );

    let event = decode(body(1, "t", 5, -1).as_bytes()).unwrap();
    assert_eq!(validate(&event).unwrap_err().to_string(), "malformed input: invalid project_id: -1");
}

#[test]
fn test_rejection_for() {
    assert_eq!(
        rejection_for(&AssignmentError::MalformedInput("x".into())),
        DeliveryState::RejectedNoRequeue
    );
    assert_eq!(
        rejection_for(&AssignmentError::NoEligibleCandidates),
        DeliveryState::RejectedRequeue
    );
    assert_eq!(
        rejection_for(&AssignmentError::CandidateFetchFailed("down".into())),
        DeliveryState::RejectedRequeue
    );
    assert_eq!(
        rejection_for(&AssignmentError::EventPublishFailed("down".into())),
        DeliveryState::RejectedRequeue
    );
}

#[test]
fn test_terminal_states() {
    assert!(!DeliveryState::Received.is_terminal());
    assert!(!DeliveryState::Dispatched.is_terminal());
    assert!(DeliveryState::Acked.is_terminal());
    assert!(DeliveryState::Abandoned.is_terminal());
    assert_eq!(DeliveryState::RejectedRequeue.to_string(), "rejected_requeue");
}
