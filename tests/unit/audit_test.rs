//! Tests for audit sink

use task_optimizer::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(1, Some(7), AuditAction::Assigned, Some("Skill match: 100%".to_string()));
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].task_id, 1);
    assert_eq!(events[0].candidate_id, Some(7));
    assert_eq!(events[0].action, AuditAction::Assigned);
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(1, None, AuditAction::FetchFailed, None));
    sink.record(build_audit_event(2, None, AuditAction::NoCandidates, None));
    sink.record(build_audit_event(3, Some(1), AuditAction::Assigned, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].task_id, 2); // First one popped
    assert_eq!(events[1].task_id, 3);
}

#[test]
fn test_events_for_task() {
    let sink = InMemoryAuditSink::new(10);
    sink.record(build_audit_event(1, Some(2), AuditAction::LoadUpdateFailed, None));
    sink.record(build_audit_event(2, Some(2), AuditAction::Assigned, None));
    sink.record(build_audit_event(1, Some(2), AuditAction::Assigned, None));

    let actions: Vec<_> = sink.events_for(1).iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::LoadUpdateFailed, AuditAction::Assigned]);
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event(5, None, AuditAction::PublishFailed, Some("broker down".to_string()));
    let b = build_audit_event(5, None, AuditAction::PublishFailed, None);

    assert_ne!(a.event_id, b.event_id);
    assert_eq!(a.detail, Some("broker down".to_string()));
    assert_eq!(a.action.to_string(), "publish_failed");
    assert!(a.created_at <= b.created_at);
}
