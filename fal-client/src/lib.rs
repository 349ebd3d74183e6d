//! fal HTTP Client
//!
//! A small, typed client for the fal.ai HTTP API, shared by the `fal`
//! command-line interface.
//!
//! This crate provides:
//! - Synchronous model runs
//! - The request queue (submit, status, result, cancel) and a backoff poller
//! - Model catalog and pricing lookups
//! - Rendering of model results for humans and machines
//!
//! # Example
//!
//! ```no_run
//! use fal_client::{FalClient, PollOptions, Poller};
//! use fal_core::dto::payload::parse_payload;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FalClient::new("my-api-key")?;
//!     let payload = parse_payload(r#"{"prompt": "a cat"}"#)?;
//!
//!     let poller = Poller::new(&client, PollOptions::default());
//!     let body = poller.run_queued("fal-ai/flux/dev", &payload, |_| {}).await?;
//!
//!     println!("{}", fal_client::decode::render_summary(&body));
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod error;
mod models;
pub mod poller;
pub mod queue;
mod run;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poller::{BackoffSchedule, PollEvent, PollOptions, Poller};
pub use queue::QueueApi;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every HTTP request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Base URLs of the three fal.ai API surfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Synchronous model runs
    pub run: String,
    /// Request queue
    pub queue: String,
    /// Platform API (catalog, pricing)
    pub platform: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            run: "https://fal.run".to_string(),
            queue: "https://queue.fal.run".to_string(),
            platform: "https://api.fal.ai/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// Create endpoints from explicit base URLs
    pub fn new(
        run: impl Into<String>,
        queue: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            run: run.into().trim_end_matches('/').to_string(),
            queue: queue.into().trim_end_matches('/').to_string(),
            platform: platform.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of a synchronous run of `endpoint_id`
    pub fn run_url(&self, endpoint_id: &str) -> String {
        format!("{}/{}", self.run, trim_model(endpoint_id))
    }

    /// URL requests are submitted to
    pub fn queue_url(&self, endpoint_id: &str) -> String {
        format!("{}/{}", self.queue, trim_model(endpoint_id))
    }

    /// URL of a queued request; its result lives here
    pub fn request_url(&self, endpoint_id: &str, request_id: &str) -> String {
        format!(
            "{}/{}/requests/{}",
            self.queue,
            trim_model(endpoint_id),
            request_id
        )
    }

    /// URL of the status of a queued request
    pub fn status_url(&self, endpoint_id: &str, request_id: &str) -> String {
        format!("{}/status", self.request_url(endpoint_id, request_id))
    }

    /// URL used to cancel a queued request
    pub fn cancel_url(&self, endpoint_id: &str, request_id: &str) -> String {
        format!("{}/cancel", self.request_url(endpoint_id, request_id))
    }

    /// URL of a platform API path such as "models/pricing"
    pub fn platform_url(&self, path: &str) -> String {
        format!("{}/{}", self.platform, path.trim_start_matches('/'))
    }
}

fn trim_model(endpoint_id: &str) -> &str {
    endpoint_id.trim_start_matches('/')
}

/// Authenticated HTTP client for the fal.ai API
///
/// Construct one per process and pass it by reference to everything that
/// talks to the API. Every request carries `Authorization: Key <api key>`
/// and `Accept: application/json`; error responses are normalized into
/// [`ClientError`]. Nothing is retried at this layer.
#[derive(Clone)]
pub struct FalClient {
    api_key: String,
    endpoints: Endpoints,
    client: Client,
}

impl std::fmt::Debug for FalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalClient")
            .field("api_key", &"<redacted>")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl FalClient {
    /// Create a new client for the public fal.ai endpoints
    ///
    /// # Arguments
    /// * `api_key` - The fal.ai API key
    ///
    /// # Example
    /// ```
    /// use fal_client::FalClient;
    ///
    /// let client = FalClient::new("my-api-key").unwrap();
    /// assert_eq!(client.endpoints().queue, "https://queue.fal.run");
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(api_key, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            api_key: api_key.into(),
            endpoints: Endpoints::default(),
            client,
        }
    }

    /// Point the client at different base URLs
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Base URLs used by this client
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // =============================================================================
    // Transport
    // =============================================================================

    /// Attach the credentials and the accepted media type
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Key {}", self.api_key))
            .header(ACCEPT, "application/json")
    }

    /// Build an authorized POST carrying `payload` as JSON
    pub(crate) fn post_request<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<RequestBuilder> {
        let body = serde_json::to_vec(payload).map_err(ClientError::Payload)?;
        Ok(self
            .authorize(self.client.post(url))
            .header(CONTENT_TYPE, "application/json")
            .body(body))
    }

    /// Build an authorized GET; the query is only added when non-empty
    pub(crate) fn get_request(&self, url: &str, params: &[(&str, String)]) -> RequestBuilder {
        let mut request = self.authorize(self.client.get(url));
        if !params.is_empty() {
            request = request.query(params);
        }
        request
    }

    /// Build an authorized PUT without a body
    pub(crate) fn put_request(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.put(url))
    }

    /// POST a JSON body and return the raw response body
    pub(crate) async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<Vec<u8>> {
        self.send(self.post_request(url, payload)?).await
    }

    /// GET with optional query parameters and return the raw response body
    pub(crate) async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<u8>> {
        self.send(self.get_request(url, params)).await
    }

    /// Send a built request and return the raw response body
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Read the body and turn error statuses into [`ClientError`]
    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        debug!("{} {} ({} bytes)", status.as_u16(), url, body.len());

        if status.as_u16() >= 400 {
            return Err(ClientError::from_response_body(status.as_u16(), &body));
        }

        Ok(body.to_vec())
    }
}

/// Deserialize a successful response body
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| ClientError::Parse(format!("parsing {}: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = FalClient::new("secret-key").unwrap();
        assert_eq!(client.endpoints(), &Endpoints::default());
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = FalClient::with_client("secret-key", Client::new());
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_endpoints_trim_trailing_slash() {
        let endpoints = Endpoints::new("http://run/", "http://queue/", "http://api/v1/");
        assert_eq!(endpoints.run_url("fal-ai/flux"), "http://run/fal-ai/flux");
        assert_eq!(endpoints.platform_url("/models"), "http://api/v1/models");
    }

    #[test]
    fn test_queue_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.queue_url("/fal-ai/flux/dev"),
            "https://queue.fal.run/fal-ai/flux/dev"
        );
        assert_eq!(
            endpoints.request_url("fal-ai/flux/dev", "r1"),
            "https://queue.fal.run/fal-ai/flux/dev/requests/r1"
        );
        assert_eq!(
            endpoints.status_url("fal-ai/flux/dev", "r1"),
            "https://queue.fal.run/fal-ai/flux/dev/requests/r1/status"
        );
        assert_eq!(
            endpoints.cancel_url("fal-ai/flux/dev", "r1"),
            "https://queue.fal.run/fal-ai/flux/dev/requests/r1/cancel"
        );
    }

    #[test]
    fn test_decode_body_reports_parse_error() {
        let result: Result<fal_core::dto::queue::QueueSubmitResponse> =
            decode_body(b"not json", "queue response");
        match result {
            Err(ClientError::Parse(msg)) => assert!(msg.starts_with("parsing queue response")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
