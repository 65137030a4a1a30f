//! Infrastructure adapters for the candidate store, event outbox, and inbound queue.

pub mod outbox;
pub mod pool;
pub mod queue;

pub use outbox::{InMemoryEventEmitter, JsonlEventEmitter};
pub use pool::InMemoryCandidatePool;
pub use queue::InMemoryBroker;
