//! Catalog and pricing API endpoints

use fal_core::dto::catalog::{ModelQuery, ModelsPage, PricingPage};

use crate::error::Result;
use crate::{FalClient, decode_body};

impl FalClient {
    // =============================================================================
    // Catalog
    // =============================================================================

    /// List models from the catalog
    ///
    /// # Arguments
    /// * `query` - Search, category and pagination filters
    ///
    /// # Returns
    /// One page of models
    pub async fn list_models(&self, query: &ModelQuery) -> Result<ModelsPage> {
        let url = self.endpoints.platform_url("models");
        let body = self.get(&url, &query.to_params()).await?;

        decode_body(&body, "models")
    }

    // =============================================================================
    // Pricing
    // =============================================================================

    /// Get pricing for one or more model endpoints
    ///
    /// # Arguments
    /// * `endpoint_ids` - Endpoint identifiers to price
    pub async fn model_pricing(&self, endpoint_ids: &[String]) -> Result<PricingPage> {
        let url = self.endpoints.platform_url("models/pricing");
        let body = self.get(&url, &pricing_params(endpoint_ids)).await?;

        decode_body(&body, "pricing")
    }
}

fn pricing_params(endpoint_ids: &[String]) -> Vec<(&'static str, String)> {
    endpoint_ids
        .iter()
        .map(|id| ("endpoint_id", id.clone()))
        .collect()
}
