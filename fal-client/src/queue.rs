//! Queue API endpoints
//!
//! Maps the lifecycle of a queued request onto the queue REST surface.
//! Nothing here checks the job state before calling the API: fetching a
//! result early or cancelling a running job is left to the remote side.

use async_trait::async_trait;
use fal_core::domain::job::QueueStatus;
use fal_core::dto::payload::Payload;
use fal_core::dto::queue::QueueSubmitResponse;
use reqwest::RequestBuilder;
use tracing::{debug, info};

use crate::error::Result;
use crate::{FalClient, decode_body};

/// Operations on the request queue of a model endpoint
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// Submit a payload to the queue of `endpoint_id`
    ///
    /// # Returns
    /// The queue receipt carrying the request ID
    async fn submit(&self, endpoint_id: &str, payload: &Payload) -> Result<QueueSubmitResponse>;

    /// Fetch the status of a queued request
    ///
    /// # Arguments
    /// * `include_logs` - Also return the model's log lines
    async fn status(
        &self,
        endpoint_id: &str,
        request_id: &str,
        include_logs: bool,
    ) -> Result<QueueStatus>;

    /// Fetch the raw result body of a completed request
    async fn result(&self, endpoint_id: &str, request_id: &str) -> Result<Vec<u8>>;

    /// Ask the queue to cancel a request that has not started yet
    async fn cancel(&self, endpoint_id: &str, request_id: &str) -> Result<()>;
}

/// Query parameters of a status request
pub(crate) fn status_params(include_logs: bool) -> Vec<(&'static str, String)> {
    if include_logs {
        vec![("logs", "1".to_string())]
    } else {
        Vec::new()
    }
}

impl FalClient {
    fn submit_request(&self, endpoint_id: &str, payload: &Payload) -> Result<RequestBuilder> {
        self.post_request(&self.endpoints.queue_url(endpoint_id), payload)
    }

    fn status_request(
        &self,
        endpoint_id: &str,
        request_id: &str,
        include_logs: bool,
    ) -> RequestBuilder {
        self.get_request(
            &self.endpoints.status_url(endpoint_id, request_id),
            &status_params(include_logs),
        )
    }

    fn result_request(&self, endpoint_id: &str, request_id: &str) -> RequestBuilder {
        self.get_request(&self.endpoints.request_url(endpoint_id, request_id), &[])
    }

    fn cancel_request(&self, endpoint_id: &str, request_id: &str) -> RequestBuilder {
        self.put_request(&self.endpoints.cancel_url(endpoint_id, request_id))
    }
}

#[async_trait]
impl QueueApi for FalClient {
    async fn submit(&self, endpoint_id: &str, payload: &Payload) -> Result<QueueSubmitResponse> {
        let body = self.send(self.submit_request(endpoint_id, payload)?).await?;
        let receipt: QueueSubmitResponse = decode_body(&body, "queue response")?;

        info!("Queued request {} on {}", receipt.request_id, endpoint_id);

        Ok(receipt)
    }

    async fn status(
        &self,
        endpoint_id: &str,
        request_id: &str,
        include_logs: bool,
    ) -> Result<QueueStatus> {
        let request = self.status_request(endpoint_id, request_id, include_logs);
        let body = self.send(request).await?;
        let status: QueueStatus = decode_body(&body, "status")?;

        debug!(
            "Request {} is {} ({} log line(s))",
            request_id,
            status.status,
            status.logs.len()
        );

        Ok(status)
    }

    async fn result(&self, endpoint_id: &str, request_id: &str) -> Result<Vec<u8>> {
        self.send(self.result_request(endpoint_id, request_id)).await
    }

    async fn cancel(&self, endpoint_id: &str, request_id: &str) -> Result<()> {
        self.send(self.cancel_request(endpoint_id, request_id)).await?;

        info!("Cancellation requested for {}", request_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fal_core::dto::payload::parse_payload;
    use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderName};
    use reqwest::{Method, Request};

    fn client() -> FalClient {
        FalClient::with_client("test-key", reqwest::Client::new())
    }

    fn header(request: &Request, name: HeaderName) -> Option<&str> {
        request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn assert_authorized(request: &Request) {
        assert_eq!(header(request, AUTHORIZATION), Some("Key test-key"));
        assert_eq!(header(request, ACCEPT), Some("application/json"));
    }

    #[test]
    fn test_status_params_only_ask_for_logs_when_requested() {
        assert!(status_params(false).is_empty());
        assert_eq!(status_params(true), vec![("logs", "1".to_string())]);
    }

    #[test]
    fn test_submit_posts_json_payload() {
        let payload = parse_payload(r#"{"prompt":"a cat","num_images":2}"#).unwrap();
        let request = client()
            .submit_request("fal-ai/flux/dev", &payload)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), "https://queue.fal.run/fal-ai/flux/dev");
        assert_authorized(&request);
        assert_eq!(header(&request, CONTENT_TYPE), Some("application/json"));

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(serde_json::from_slice::<Payload>(body).unwrap(), payload);
    }

    #[test]
    fn test_status_asks_for_logs_in_query() {
        let request = client()
            .status_request("fal-ai/flux/dev", "r1", true)
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(
            request.url().path(),
            "/fal-ai/flux/dev/requests/r1/status"
        );
        assert_eq!(request.url().query(), Some("logs=1"));
        assert_authorized(&request);
        assert_eq!(header(&request, CONTENT_TYPE), None);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_status_without_logs_has_no_query() {
        let request = client()
            .status_request("fal-ai/flux/dev", "r1", false)
            .build()
            .unwrap();

        assert_eq!(request.url().query(), None);
        assert_authorized(&request);
    }

    #[test]
    fn test_result_is_fetched_from_request_url() {
        let request = client()
            .result_request("fal-ai/flux/dev", "r1")
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://queue.fal.run/fal-ai/flux/dev/requests/r1"
        );
        assert_authorized(&request);
    }

    #[test]
    fn test_cancel_is_a_bodyless_put() {
        let request = client()
            .cancel_request("fal-ai/flux/dev", "r1")
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(
            request.url().as_str(),
            "https://queue.fal.run/fal-ai/flux/dev/requests/r1/cancel"
        );
        assert_authorized(&request);
        assert_eq!(header(&request, CONTENT_TYPE), None);
        assert!(request.body().is_none());
    }
}
