//! Tests for the consumer loop

use std::sync::Arc;

use task_optimizer::core::{AssignmentOrchestrator, DeliveryController};
use task_optimizer::infra::{InMemoryBroker, InMemoryCandidatePool, InMemoryEventEmitter};
use task_optimizer::runtime::Consumer;
use tokio_util::sync::CancellationToken;

fn controller() -> DeliveryController<Arc<InMemoryCandidatePool>, Arc<InMemoryCandidatePool>, Arc<InMemoryEventEmitter>> {
    let pool = Arc::new(InMemoryCandidatePool::new());
    let orchestrator = AssignmentOrchestrator::new(pool.clone(), pool, Arc::new(InMemoryEventEmitter::new()));
    DeliveryController::new(Arc::new(orchestrator))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_consumer_stops_when_source_closes() {
    let broker = InMemoryBroker::new();
    broker.close();

    let consumer = Consumer::new("task.created", 2);
    let stats = consumer.run(&broker, controller(), CancellationToken::new()).await;
    assert_eq!(stats.received, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_consumer_stops_on_cancel() {
    let broker = InMemoryBroker::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let consumer = Consumer::new("task.created", 2);
    let stats = consumer.run(&broker, controller(), cancel).await;
    assert_eq!(stats.completed(), 0);
}
