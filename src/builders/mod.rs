//! Builders to construct the assignment service from configuration.

pub mod service_builder;

pub use service_builder::{build_from_env, build_service, build_with_outbox, jsonl_outbox, AssignmentService};
