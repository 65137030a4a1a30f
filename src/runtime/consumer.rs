//! Bounded-concurrency consumer loop.
//!
//! Pulls deliveries from a [`DeliverySource`] and runs each through a
//! [`DeliveryController`] on its own tokio task. At most `worker_count` cycles
//! are in flight; receiving pauses until a slot frees up. On cancellation the
//! loop stops receiving and waits for in-flight cycles, which observe the same
//! token and end `Abandoned` if they have not settled yet.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::core::{
    CandidateReader, DeliveryController, DeliveryReport, DeliverySource, DeliveryState, EventEmitter,
    LoadWriter,
};

/// Point-in-time view of consumer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Deliveries taken from the source.
    pub received: u64,
    /// Cycles that ended acked.
    pub acked: u64,
    /// Cycles rejected without requeue.
    pub rejected: u64,
    /// Cycles rejected with requeue.
    pub requeued: u64,
    /// Cycles left unsettled (cancelled or panicked).
    pub abandoned: u64,
}

impl ConsumerStats {
    /// Cycles that reached a terminal state.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.acked + self.rejected + self.requeued + self.abandoned
    }
}

#[derive(Default)]
struct ConsumerCounters {
    received: AtomicU64,
    acked: AtomicU64,
    rejected: AtomicU64,
    requeued: AtomicU64,
    abandoned: AtomicU64,
}

impl ConsumerCounters {
    fn snapshot(&self) -> ConsumerStats {
        ConsumerStats {
            received: self.received.load(Ordering::Relaxed),
            acked: self.acked.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }

    fn record(&self, state: DeliveryState) {
        let counter = match state {
            DeliveryState::Acked => &self.acked,
            DeliveryState::RejectedNoRequeue => &self.rejected,
            DeliveryState::RejectedRequeue => &self.requeued,
            _ => &self.abandoned,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Consumes one queue with a fixed number of concurrent cycles.
pub struct Consumer {
    queue: String,
    worker_count: usize,
    counters: Arc<ConsumerCounters>,
}

impl Consumer {
    /// Create a consumer for `queue` running up to `worker_count` cycles at once.
    ///
    /// A `worker_count` of zero is treated as one.
    pub fn new(queue: impl Into<String>, worker_count: usize) -> Self {
        Self {
            queue: queue.into(),
            worker_count: worker_count.max(1),
            counters: Arc::new(ConsumerCounters::default()),
        }
    }

    /// Name of the consumed queue.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Concurrency limit.
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Live counters.
    pub fn stats(&self) -> ConsumerStats {
        self.counters.snapshot()
    }

    /// Run until the source closes or `cancel` fires, then drain in-flight cycles.
    pub async fn run<S, R, W, E>(
        &self,
        source: &S,
        controller: DeliveryController<R, W, E>,
        cancel: CancellationToken,
    ) -> ConsumerStats
    where
        S: DeliverySource,
        R: CandidateReader,
        W: LoadWriter,
        E: EventEmitter,
    {
        let semaphore = Arc::new(Semaphore::new(self.worker_count));
        let mut in_flight: JoinSet<DeliveryReport> = JoinSet::new();

        tracing::info!(
            queue = %self.queue,
            worker_count = self.worker_count,
            "consumer started"
        );

        loop {
            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let delivery = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                delivery = source.recv() => match delivery {
                    Some(delivery) => delivery,
                    None => {
                        tracing::info!(queue = %self.queue, "source closed");
                        break;
                    }
                },
            };
            self.counters.received.fetch_add(1, Ordering::Relaxed);

            let controller = controller.clone();
            let token = cancel.clone();
            in_flight.spawn(async move {
                let _permit = permit;
                controller.process(delivery, &token).await
            });

            while let Some(joined) = in_flight.try_join_next() {
                self.on_cycle_end(joined);
            }
        }

        let pending = in_flight.len();
        if pending > 0 {
            tracing::info!(queue = %self.queue, pending, "waiting for in-flight cycles");
        }
        while let Some(joined) = in_flight.join_next().await {
            self.on_cycle_end(joined);
        }

        let stats = self.stats();
        tracing::info!(
            queue = %self.queue,
            received = stats.received,
            acked = stats.acked,
            rejected = stats.rejected,
            requeued = stats.requeued,
            abandoned = stats.abandoned,
            "consumer stopped"
        );
        stats
    }

    fn on_cycle_end(&self, joined: Result<DeliveryReport, JoinError>) {
        match joined {
            Ok(report) => {
                tracing::debug!(
                    delivery_tag = report.delivery_tag,
                    task_id = ?report.task_id,
                    state = %report.state(),
                    "cycle finished"
                );
                self.counters.record(report.state());
            }
            Err(e) => {
                tracing::error!(queue = %self.queue, error = %e, "delivery cycle panicked");
                self.counters.record(DeliveryState::Abandoned);
            }
        }
    }
}
