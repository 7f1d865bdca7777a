use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// One human-readable line produced by a desk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub recorded_at: DateTime<Utc>,
    pub message: String,
}

/// Session log shown to whoever drives the desk. Append-only; never cleared
/// while the desk is open.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn record(&mut self, message: impl Into<String>) -> &ActivityEntry {
        let entry = ActivityEntry {
            recorded_at: Utc::now(),
            message: message.into(),
        };
        info!(activity = %entry.message, "desk activity");
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.message.as_str())
    }

    /// Entries appended after the first `offset`, for front ends that echo only
    /// what the last operation produced.
    pub fn since(&self, offset: usize) -> &[ActivityEntry] {
        self.entries.get(offset..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
