//! Queue DTOs

use serde::{Deserialize, Serialize};

/// Receipt returned when a request is accepted by the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSubmitResponse {
    pub request_id: String,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub status_url: String,
    #[serde(default)]
    pub cancel_url: String,
}
