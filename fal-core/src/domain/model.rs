//! Catalog model domain types

use serde::{Deserialize, Serialize};

/// A model endpoint listed in the fal.ai catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Endpoint identifier, e.g. "fal-ai/flux/dev"
    pub endpoint_id: String,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

/// Display information attached to a catalog model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub display_name: String,
    pub category: String,
    pub description: String,
    pub status: String,
    pub tags: Vec<String>,
    pub updated_at: String,
    pub thumbnail_url: String,
    pub model_url: String,
}
