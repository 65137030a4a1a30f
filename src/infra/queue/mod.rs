//! Inbound queue backends.

pub mod memory;

pub use memory::{InMemoryBroker, InMemoryDelivery, QueueStats};
