//! Synchronous run endpoint

use fal_core::dto::payload::Payload;
use tracing::info;

use crate::FalClient;
use crate::error::Result;

impl FalClient {
    /// Run a model synchronously
    ///
    /// The connection stays open until the model returns.
    ///
    /// # Arguments
    /// * `endpoint_id` - Model endpoint, e.g. "fal-ai/nano-banana-pro/edit"
    /// * `payload` - Model input
    ///
    /// # Returns
    /// The raw response body
    pub async fn run_sync(&self, endpoint_id: &str, payload: &Payload) -> Result<Vec<u8>> {
        let url = self.endpoints.run_url(endpoint_id);
        info!("Running {} synchronously", endpoint_id);

        self.post_json(&url, payload).await
    }
}
