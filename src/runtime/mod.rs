//! Runtime adapters that drive delivery cycles on tokio.

pub mod consumer;

pub use consumer::{Consumer, ConsumerStats};
