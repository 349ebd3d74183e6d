//! Pricing domain types

use serde::{Deserialize, Serialize};

/// Unit price of a single model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPrice {
    pub endpoint_id: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub currency: String,
}
