//! Candidate store backends.

pub mod memory;

pub use memory::InMemoryCandidatePool;
