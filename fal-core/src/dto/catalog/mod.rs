//! Catalog and pricing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::model::Model;
use crate::domain::pricing::ModelPrice;

/// Filters for listing the model catalog
#[derive(Debug, Clone, Default)]
pub struct ModelQuery {
    /// Free-text search
    pub search: Option<String>,
    /// Category filter, e.g. "text-to-image"
    pub category: Option<String>,
    /// Pagination cursor from a previous page
    pub cursor: Option<String>,
    /// Maximum number of models; zero means the server default
    pub limit: u32,
}

impl ModelQuery {
    /// Query parameters to send, skipping unset filters
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let filters = [
            ("q", &self.search),
            ("category", &self.category),
            ("cursor", &self.cursor),
        ];
        for (name, value) in filters {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                params.push((name, value.to_string()));
            }
        }
        if self.limit > 0 {
            params.push(("limit", self.limit.to_string()));
        }
        params
    }
}

/// One page of the model catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsPage {
    pub models: Vec<Model>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// One page of model prices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPage {
    pub prices: Vec<ModelPrice>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}
