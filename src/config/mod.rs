//! Configuration models for the assignment service.

pub mod service;

pub use service::ServiceConfig;
