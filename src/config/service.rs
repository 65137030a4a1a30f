//! Service configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

const DEFAULT_WORKER_COUNT: usize = 5;
const DEFAULT_AUDIT_CAPACITY: usize = 1024;

/// Runtime settings for the assignment consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum delivery cycles processed concurrently.
    pub worker_count: usize,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Queue carrying task-creation notifications.
    pub task_created_queue: String,
    /// Routing key stamped on assigned events.
    pub task_assigned_routing_key: String,
    /// Optional JSON lines outbox for assigned events.
    pub event_log_path: Option<PathBuf>,
    /// Number of audit events kept in memory.
    pub audit_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            log_level: "info".into(),
            task_created_queue: "task.created".into(),
            task_assigned_routing_key: "task.assigned".into(),
            event_log_path: None,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("worker_count must be greater than 0".into()));
        }
        if self.task_created_queue.trim().is_empty() {
            return Err(ConfigError::Invalid("task_created_queue must not be empty".into()));
        }
        if self.task_assigned_routing_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "task_assigned_routing_key must not be empty".into(),
            ));
        }
        if self.audit_capacity == 0 {
            return Err(ConfigError::Invalid("audit_capacity must be greater than 0".into()));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or a validation error.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| ConfigError::Parse {
            key: "<json>".into(),
            reason: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.env` file (if present) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup, falling back to defaults.
    ///
    /// Recognized keys: `WORKER_COUNT`, `LOG_LEVEL`, `TASK_CREATED_QUEUE`,
    /// `TASK_ASSIGNED_ROUTING_KEY`, `EVENT_LOG_PATH`, `AUDIT_CAPACITY`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not parse or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let cfg = Self {
            worker_count: parse_or(get("WORKER_COUNT"), "WORKER_COUNT", defaults.worker_count)?,
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            task_created_queue: get("TASK_CREATED_QUEUE").unwrap_or(defaults.task_created_queue),
            task_assigned_routing_key: get("TASK_ASSIGNED_ROUTING_KEY")
                .unwrap_or(defaults.task_assigned_routing_key),
            event_log_path: get("EVENT_LOG_PATH").map(PathBuf::from),
            audit_capacity: parse_or(get("AUDIT_CAPACITY"), "AUDIT_CAPACITY", defaults.audit_capacity)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map_or(Ok(default), |value| {
        value.trim().parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            reason: e.to_string(),
        })
    })
}
