//! Tests for configuration validation

use std::collections::HashMap;
use std::path::PathBuf;

use task_optimizer::config::ServiceConfig;
use task_optimizer::core::ConfigError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_are_valid() {
    let cfg = ServiceConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.worker_count, 5);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.task_created_queue, "task.created");
    assert_eq!(cfg.task_assigned_routing_key, "task.assigned");
    assert_eq!(cfg.event_log_path, None);
}

#[test]
fn test_invalid_worker_count() {
    let cfg = ServiceConfig {
        worker_count: 0,
        ..ServiceConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_invalid_queue_name() {
    let cfg = ServiceConfig {
        task_created_queue: "  ".to_string(),
        ..ServiceConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_from_lookup_overrides() {
    let cfg = ServiceConfig::from_lookup(lookup(&[
        ("WORKER_COUNT", "12"),
        ("LOG_LEVEL", "debug"),
        ("EVENT_LOG_PATH", "/tmp/assigned.jsonl"),
    ]))
    .unwrap();

    assert_eq!(cfg.worker_count, 12);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.event_log_path, Some(PathBuf::from("/tmp/assigned.jsonl")));
    assert_eq!(cfg.task_created_queue, "task.created");
}

#[test]
fn test_from_lookup_empty_values_use_defaults() {
    let cfg = ServiceConfig::from_lookup(lookup(&[("WORKER_COUNT", ""), ("LOG_LEVEL", "")])).unwrap();
    assert_eq!(cfg, ServiceConfig::default());
}

#[test]
fn test_from_lookup_parse_error() {
    let err = ServiceConfig::from_lookup(lookup(&[("WORKER_COUNT", "five")])).unwrap_err();
    match err {
        ConfigError::Parse { key, .. } => assert_eq!(key, "WORKER_COUNT"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_from_lookup_validates() {
    assert!(ServiceConfig::from_lookup(lookup(&[("AUDIT_CAPACITY", "0")])).is_err());
}

#[test]
fn test_from_json_str() {
    let cfg = ServiceConfig::from_json_str(r#"{"worker_count": 2, "task_created_queue": "tasks.in"}"#).unwrap();
    assert_eq!(cfg.worker_count, 2);
    assert_eq!(cfg.task_created_queue, "tasks.in");
    assert_eq!(cfg.audit_capacity, 1024);

    assert!(ServiceConfig::from_json_str("{not json").is_err());
    assert!(ServiceConfig::from_json_str(r#"{"worker_count": 0}"#).is_err());
}
