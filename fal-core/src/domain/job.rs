//! Queue job domain types
//!
//! A job moves through `Queued -> Running -> Completed`. Failures are never
//! reported as a state; they surface as errors from the API calls instead.

use serde::{Deserialize, Serialize};

use crate::domain::log::LogEntry;

/// Lifecycle state of a queued request
///
/// States this client does not know are kept verbatim so they survive a
/// decode and re-encode unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueueState {
    /// Waiting for a worker
    Queued,
    /// Being processed by a worker
    Running,
    /// Finished; the result can be fetched
    Completed,
    /// Any other state, as sent by the queue
    Unknown(String),
}

impl QueueState {
    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueState::Completed)
    }

    /// Wire name of the state
    pub fn as_str(&self) -> &str {
        match self {
            QueueState::Queued => "IN_QUEUE",
            QueueState::Running => "IN_PROGRESS",
            QueueState::Completed => "COMPLETED",
            QueueState::Unknown(state) => state.as_str(),
        }
    }
}

impl From<String> for QueueState {
    fn from(state: String) -> Self {
        let known = match state.as_str() {
            "IN_QUEUE" => Some(QueueState::Queued),
            "IN_PROGRESS" => Some(QueueState::Running),
            "COMPLETED" => Some(QueueState::Completed),
            _ => None,
        };
        known.unwrap_or(QueueState::Unknown(state))
    }
}

impl From<QueueState> for String {
    fn from(state: QueueState) -> Self {
        match state {
            QueueState::Unknown(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for QueueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a queued request as returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub status: QueueState,
    /// Only present while the request is still queued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<u32>,
    /// Only populated when logs were requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
}
