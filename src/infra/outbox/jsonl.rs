//! File-backed event emitter.
//!
//! Each published event is appended as one JSON line wrapped with its routing
//! key, so an external relay can tail the file and forward to the broker.
//! File writes run on tokio's blocking pool.

use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{BackendError, EventEmitter, TaskAssignedEvent};

/// One line of the outbox file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// Routing key the event is meant for.
    pub routing_key: String,
    /// The event itself.
    pub event: TaskAssignedEvent,
}

/// Appends assigned events to a JSON lines file.
pub struct JsonlEventEmitter {
    path: PathBuf,
    routing_key: String,
    // Serializes appends so lines never interleave.
    write_lock: Arc<Mutex<()>>,
}

impl JsonlEventEmitter {
    /// Create an emitter writing to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] when the parent directory cannot be created.
    pub fn new(path: impl AsRef<Path>, routing_key: impl Into<String>) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            routing_key: routing_key.into(),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Path of the outbox file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record written so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line does not parse.
    pub fn read_all(&self) -> Result<Vec<OutboxRecord>, BackendError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(&self.path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    async fn append(&self, record: &OutboxRecord) -> Result<(), BackendError> {
        let line = serde_json::to_string(record)?;
        let path = self.path.clone();
        let write_lock = Arc::clone(&self.write_lock);
        tokio::task::spawn_blocking(move || append_line(&path, &write_lock, &line))
            .await
            .map_err(|e| BackendError::Io(std::io::Error::other(e)))?
    }
}

fn append_line(path: &Path, write_lock: &Mutex<()>, line: &str) -> Result<(), BackendError> {
    let _guard = write_lock.lock();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    file.flush()?;
    Ok(())
}

#[async_trait]
impl EventEmitter for JsonlEventEmitter {
    async fn publish_assigned(&self, event: &TaskAssignedEvent) -> Result<(), BackendError> {
        let record = OutboxRecord {
            routing_key: self.routing_key.clone(),
            event: event.clone(),
        };
        self.append(&record).await?;
        tracing::info!(
            task_id = event.task_id,
            assignee_id = event.assignee_id,
            path = %self.path.display(),
            "appended task assigned event to outbox"
        );
        Ok(())
    }
}
