// pipeline-logger-rs/src/store.rs
// Where log entries go

use async_trait::async_trait;
use tokio::sync::Mutex;

use shared_types_rs::{LogEntry, PipelineError, Result};

/// Append-only sink for pipeline log entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Write one entry. Entries are never updated or deleted.
    async fn put(&self, entry: &LogEntry) -> Result<()>;
}

/// In-process store for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn put(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|e| e.pipeline_id == entry.pipeline_id) {
            return Err(PipelineError::Persistence(format!(
                "entry for pipeline {} already written",
                entry.pipeline_id
            )));
        }
        entries.push(entry.clone());
        Ok(())
    }
}
