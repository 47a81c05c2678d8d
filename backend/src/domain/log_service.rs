//! Family activity log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::storage::JsonStore;
use shared::{CreateLogRequest, LogEntry, User};

/// Service for reading and appending the family activity log.
#[derive(Clone)]
pub struct LogService {
    store: Arc<JsonStore>,
}

impl LogService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// The caller's family log, newest timestamp first. Entries are stored
    /// newest-first by insertion already; sorting by timestamp on top keeps
    /// the order stable when entries share one timestamp.
    pub async fn list_logs(&self, caller: &User) -> Result<Vec<LogEntry>> {
        let mut logs: Vec<LogEntry> = self.store.read(|data| {
            data.logs
                .iter()
                .filter(|l| l.family_id == caller.family_id)
                .cloned()
                .collect()
        });
        logs.sort_by_key(|l| std::cmp::Reverse(timestamp_millis(&l.timestamp)));
        Ok(logs)
    }

    /// Append a free-text entry to the caller's family log.
    pub async fn create_log(&self, caller: &User, request: CreateLogRequest) -> Result<LogEntry> {
        let message = match request.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => return Err(ServiceError::Validation("message is required".to_string())),
        };

        info!("Appending log entry for family {}", caller.family_id);

        let entry = LogEntry {
            id: LogEntry::generate_id(),
            family_id: caller.family_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        };
        let created = entry.clone();
        self.store.mutate(move |data| {
            data.logs.insert(0, entry);
            Ok(())
        })?;
        Ok(created)
    }
}

fn timestamp_millis(timestamp: &str) -> i64 {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}
