//! Assigned-event emitters.

pub mod jsonl;
pub mod memory;

pub use jsonl::{JsonlEventEmitter, OutboxRecord};
pub use memory::InMemoryEventEmitter;
