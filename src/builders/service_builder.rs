//! Builders to wire collaborators into a running assignment service.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::config::ServiceConfig;
use crate::core::{
    AppResult, AssignmentOrchestrator, CandidateReader, ConfigError, DeliveryController, DeliverySource, EventEmitter,
    InMemoryAuditSink, LoadWriter,
};
use crate::infra::JsonlEventEmitter;
use crate::runtime::{Consumer, ConsumerStats};
use crate::util::init_tracing_with_level;

/// Fully wired service: orchestrator, delivery controller and consumer.
pub struct AssignmentService<R, W, E> {
    config: ServiceConfig,
    controller: DeliveryController<R, W, E>,
    consumer: Consumer,
    audit: Arc<InMemoryAuditSink>,
}

impl<R, W, E> AssignmentService<R, W, E>
where
    R: CandidateReader,
    W: LoadWriter,
    E: EventEmitter,
{
    /// Configuration the service was built from.
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Controller for driving single deliveries directly.
    pub const fn controller(&self) -> &DeliveryController<R, W, E> {
        &self.controller
    }

    /// Audit trail of assignment decisions.
    pub fn audit(&self) -> Arc<InMemoryAuditSink> {
        Arc::clone(&self.audit)
    }

    /// Live consumer counters.
    pub fn stats(&self) -> ConsumerStats {
        self.consumer.stats()
    }

    /// Consume `source` until it closes or `cancel` fires.
    pub async fn run<S: DeliverySource>(&self, source: &S, cancel: CancellationToken) -> ConsumerStats {
        self.consumer.run(source, self.controller.clone(), cancel).await
    }
}

/// Build an assignment service from configuration and collaborators.
///
/// # Errors
///
/// Returns the validation error when `cfg` is invalid.
pub fn build_service<R, W, E>(
    cfg: ServiceConfig,
    reader: R,
    writer: W,
    emitter: E,
) -> Result<AssignmentService<R, W, E>, ConfigError>
where
    R: CandidateReader,
    W: LoadWriter,
    E: EventEmitter,
{
    cfg.validate()?;

    let audit = Arc::new(InMemoryAuditSink::new(cfg.audit_capacity));
    let orchestrator = AssignmentOrchestrator::new(reader, writer, emitter).with_audit(audit.clone());
    let controller = DeliveryController::new(Arc::new(orchestrator));
    let consumer = Consumer::new(cfg.task_created_queue.clone(), cfg.worker_count);

    tracing::debug!(
        queue = %cfg.task_created_queue,
        routing_key = %cfg.task_assigned_routing_key,
        worker_count = cfg.worker_count,
        "assignment service built"
    );

    Ok(AssignmentService {
        config: cfg,
        controller,
        consumer,
        audit,
    })
}

/// File outbox for `cfg.event_log_path`, if one is configured.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the outbox directory cannot be created.
pub fn jsonl_outbox(cfg: &ServiceConfig) -> Result<Option<JsonlEventEmitter>, ConfigError> {
    cfg.event_log_path
        .as_ref()
        .map(|path| {
            JsonlEventEmitter::new(path, cfg.task_assigned_routing_key.clone())
                .map_err(|e| ConfigError::Invalid(format!("event_log_path {}: {e}", path.display())))
        })
        .transpose()
}

/// Build a service that publishes to the configured outbox file, or to
/// `fallback` when `cfg.event_log_path` is unset.
///
/// # Errors
///
/// Returns an error if the outbox cannot be opened or `cfg` is invalid.
pub fn build_with_outbox<R, W>(
    cfg: ServiceConfig,
    reader: R,
    writer: W,
    fallback: Arc<dyn EventEmitter>,
) -> AppResult<AssignmentService<R, W, Arc<dyn EventEmitter>>>
where
    R: CandidateReader,
    W: LoadWriter,
{
    let emitter: Arc<dyn EventEmitter> = match jsonl_outbox(&cfg).context("opening event outbox")? {
        Some(outbox) => Arc::new(outbox),
        None => fallback,
    };
    Ok(build_service(cfg, reader, writer, emitter)?)
}

/// Load configuration from the environment, install tracing, and build the service.
///
/// # Errors
///
/// Returns an error if configuration does not load or the service cannot be built.
pub fn build_from_env<R, W>(
    reader: R,
    writer: W,
    fallback: Arc<dyn EventEmitter>,
) -> AppResult<AssignmentService<R, W, Arc<dyn EventEmitter>>>
where
    R: CandidateReader,
    W: LoadWriter,
{
    let cfg = ServiceConfig::from_env().context("loading service configuration")?;
    init_tracing_with_level(&cfg.log_level);
    build_with_outbox(cfg, reader, writer, fallback)
}
