//! # Task Optimizer
//!
//! Assignment decision engine for newly created tasks.
//!
//! When a task-creation notification arrives, the service picks the single best
//! assignee from the eligible candidate pool, records the assignment against
//! that candidate's load, and publishes an assignment event. Every notification
//! is then settled exactly once: acknowledged, dropped, or requeued for another
//! attempt.
//!
//! ## Scoring
//!
//! Each candidate gets a score in `[0, 1]`:
//!
//! ```text
//! total = 0.4 * skill_match + 0.4 * (1 - load / capacity) + 0.2 * priority / 5
//! ```
//!
//! The highest score wins; ties go to the candidate that came first in the pool.
//!
//! ## Delivery rules
//!
//! - Undecodable or structurally invalid messages are rejected without requeue.
//! - Orchestrator failures (fetch, empty pool, publish) are rejected with requeue.
//! - A failed load increment is logged and audited but the event is still published.
//! - Cancelled cycles are left unsettled so the transport redelivers them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use task_optimizer::builders::build_service;
//! use task_optimizer::config::ServiceConfig;
//! use task_optimizer::infra::{InMemoryBroker, InMemoryCandidatePool, InMemoryEventEmitter};
//! use tokio_util::sync::CancellationToken;
//!
//! let cfg = ServiceConfig::from_env()?;
//! task_optimizer::util::init_tracing_with_level(&cfg.log_level);
//!
//! let pool = Arc::new(InMemoryCandidatePool::from_candidates(candidates));
//! let service = build_service(cfg, pool.clone(), pool, Arc::new(InMemoryEventEmitter::new()))?;
//!
//! let broker = InMemoryBroker::new();
//! let stats = service.run(&broker, CancellationToken::new()).await;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Scoring, orchestration, delivery control, and the types they share.
pub mod core;
/// Service configuration.
pub mod config;
/// Builders to construct the service from configuration.
pub mod builders;
/// Infrastructure adapters for candidates, events, and the inbound queue.
pub mod infra;
/// Tokio consumer loop.
pub mod runtime;
/// Shared utilities.
pub mod util;
