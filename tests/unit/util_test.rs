//! Tests for utility functions

use task_optimizer::util::{init_tracing, init_tracing_with_level};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing_with_level("debug");
    init_tracing();
    init_tracing_with_level("info");
    tracing::info!("tracing initialized");
}
