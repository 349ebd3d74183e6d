//! Log domain types

use serde::{Deserialize, Serialize};

/// A log line emitted by a model while a queued request is processed
///
/// All fields are free-form strings as reported by the queue; missing fields
/// decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    /// Identity of a log line across overlapping status windows
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.timestamp, &self.message)
    }
}
