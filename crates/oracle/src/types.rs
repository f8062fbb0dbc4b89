//! Core oracle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use usdi_core::{AssetId, Wad};

use crate::OracleError;

/// A price quote with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// The priced asset
    pub asset: AssetId,
    /// USD per whole token, 18 decimals
    pub value: Wad,
    /// Timestamp when this price was recorded
    pub timestamp: DateTime<Utc>,
    /// Source of the price (e.g., "mock", "chainlink")
    pub source: String,
}

impl Price {
    pub fn new(asset: AssetId, value: Wad, source: impl Into<String>) -> Self {
        Self {
            asset,
            value,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

/// Price Oracle trait - interface for price feeds
///
/// Queried synchronously on every solvency and liquidation call.
pub trait PriceOracle: Send + Sync {
    /// Get the current quote for an asset
    fn get_price(&self, asset: &AssetId) -> Result<Price, OracleError>;

    /// Live USD price of one whole token
    fn live_price(&self, asset: &AssetId) -> Result<Wad, OracleError> {
        let price = self.get_price(asset)?;
        if price.value.is_zero() {
            return Err(OracleError::InvalidPrice {
                asset: asset.clone(),
                reason: "zero price".to_string(),
            });
        }
        Ok(price.value)
    }

    /// All assets with a configured price
    fn supported_assets(&self) -> Vec<AssetId>;

    fn is_supported(&self, asset: &AssetId) -> bool {
        self.supported_assets().contains(asset)
    }
}
