//! Tests for builder modules

use std::sync::Arc;

use task_optimizer::builders::{build_service, jsonl_outbox};
use task_optimizer::config::ServiceConfig;
use task_optimizer::infra::{InMemoryCandidatePool, InMemoryEventEmitter};

#[test]
fn test_build_service_defaults() {
    let pool = Arc::new(InMemoryCandidatePool::new());
    let service = build_service(
        ServiceConfig::default(),
        pool.clone(),
        pool,
        Arc::new(InMemoryEventEmitter::new()),
    )
    .unwrap();

    assert_eq!(service.config().worker_count, 5);
    assert_eq!(service.stats().received, 0);
    assert!(service.audit().events().is_empty());
}

#[test]
fn test_build_service_rejects_invalid_config() {
    let pool = Arc::new(InMemoryCandidatePool::new());
    let cfg = ServiceConfig {
        worker_count: 0,
        ..ServiceConfig::default()
    };
    assert!(build_service(cfg, pool.clone(), pool, Arc::new(InMemoryEventEmitter::new())).is_err());
}

#[test]
fn test_jsonl_outbox_from_config() {
    assert!(jsonl_outbox(&ServiceConfig::default()).unwrap().is_none());

    let dir = tempfile::tempdir().unwrap();
    let cfg = ServiceConfig {
        event_log_path: Some(dir.path().join("events/assigned.jsonl")),
        ..ServiceConfig::default()
    };
    let outbox = jsonl_outbox(&cfg).unwrap().unwrap();
    assert!(outbox.path().ends_with("events/assigned.jsonl"));
    assert!(dir.path().join("events").is_dir());
}

#[tokio::test]
async fn test_build_with_outbox_prefers_file() {
    use task_optimizer::builders::build_with_outbox;
    use task_optimizer::core::{Candidate, EventEmitter};
    use task_optimizer::infra::{InMemoryBroker, JsonlEventEmitter};
    use tokio_util::sync::CancellationToken;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assigned.jsonl");
    let cfg = ServiceConfig {
        event_log_path: Some(path.clone()),
        ..ServiceConfig::default()
    };
    let pool = Arc::new(InMemoryCandidatePool::from_candidates([Candidate::new(1, "Alice", 3)]));
    let fallback = Arc::new(InMemoryEventEmitter::new());
    let fallback_dyn: Arc<dyn EventEmitter> = fallback.clone();
    let service = build_with_outbox(cfg, pool.clone(), pool, fallback_dyn).unwrap();

    let broker = InMemoryBroker::new();
    broker
        .publish_json(&serde_json::json!({
            "task_id": 1,
            "title": "write docs",
            "priority": 2,
            "project_id": 1,
            "created_at": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
    broker.close();
    let stats = service.run(&broker, CancellationToken::new()).await;

    assert_eq!(stats.acked, 1);
    assert!(fallback.events().is_empty());
    let records = JsonlEventEmitter::new(&path, "task.assigned").unwrap().read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].routing_key, "task.assigned");
    assert_eq!(records[0].event.assignee_id, 1);
}
