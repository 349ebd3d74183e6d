//! Error types for the fal client

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the fal client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, timeout or unreadable response
    #[error("request failed")]
    Request(#[from] reqwest::Error),

    /// The API rejected the request with a structured explanation
    #[error("{message}")]
    Api {
        /// Status reported by the API
        status: u16,
        /// Error detail from the API
        message: String,
    },

    /// The API returned an error status without a usable explanation
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request payload could not be encoded
    #[error("encoding request")]
    Payload(#[source] serde_json::Error),

    /// A successful response did not have the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Polling gave up before the request completed
    #[error("timed out after {0:?} waiting for the request to complete")]
    Timeout(Duration),
}

/// Error body returned by the fal.ai API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
    #[serde(default)]
    status: u16,
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Normalize an error response
    ///
    /// Bodies shaped like `{"detail": "...", "status": N}` with a non-empty
    /// detail become [`ClientError::Api`]; anything else is kept raw in
    /// [`ClientError::Http`].
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) if !parsed.detail.is_empty() => {
                let status = if parsed.status != 0 {
                    parsed.status
                } else {
                    status
                };
                Self::api_error(status, parsed.detail)
            }
            _ => Self::Http {
                status,
                body: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    /// Status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_becomes_api_error() {
        let err = ClientError::from_response_body(
            422,
            br#"{"detail":"Request is still in progress","status":400}"#,
        );
        match &err {
            ClientError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Request is still in progress");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.to_string(), "Request is still in progress");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_detail_without_status_uses_http_status() {
        let err = ClientError::from_response_body(401, br#"{"detail":"Invalid key"}"#);
        assert!(matches!(err, ClientError::Api { status: 401, .. }));
    }

    #[test]
    fn test_empty_detail_falls_back_to_http_error() {
        let err = ClientError::from_response_body(500, br#"{"detail":""}"#);
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_unstructured_body_is_kept_raw() {
        let err = ClientError::from_response_body(502, b"Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_non_string_detail_is_kept_raw() {
        let body = br#"{"detail":[{"loc":["body","prompt"],"msg":"field required"}]}"#;
        let err = ClientError::from_response_body(422, body);
        match err {
            ClientError::Http { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("field required"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_is_reported_once_in_chain() {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();
        let inner = source.to_string();

        let rendered = format!("{:#}", anyhow::Error::from(ClientError::from(source)));
        assert!(rendered.starts_with("request failed: "));
        assert_eq!(rendered.matches(inner.as_str()).count(), 1);
    }

    #[test]
    fn test_payload_error_is_reported_once_in_chain() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let inner = source.to_string();

        let rendered = format!("{:#}", anyhow::Error::from(ClientError::Payload(source)));
        assert_eq!(rendered, format!("encoding request: {}", inner));
    }
}
