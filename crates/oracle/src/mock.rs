//! Mock Oracle for testing and simulation
//!
//! Provides configurable fixed prices.

use std::collections::HashMap;
use std::sync::RwLock;

use usdi_core::{AssetId, Wad};

use crate::error::OracleError;
use crate::types::{Price, PriceOracle};

/// Mock Price Oracle
///
/// Stores fixed prices that can be updated programmatically, e.g. to push a
/// vault under water in a test.
#[derive(Debug, Default)]
pub struct MockOracle {
    /// Stored prices (asset -> price)
    prices: RwLock<HashMap<AssetId, Price>>,
}

impl MockOracle {
    /// Create a new empty mock oracle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock oracle from `(asset, price)` pairs
    pub fn with_prices(prices: impl IntoIterator<Item = (AssetId, Wad)>) -> Self {
        let oracle = Self::new();
        for (asset, price) in prices {
            oracle.set_price(asset, price);
        }
        oracle
    }

    /// Set a fixed price for an asset
    pub fn set_price(&self, asset: AssetId, value: Wad) {
        let price = Price::new(asset.clone(), value, "mock");
        let mut prices = self.prices.write().unwrap_or_else(|e| e.into_inner());
        prices.insert(asset, price);
    }

    /// Remove a price (for testing the unavailable path)
    pub fn remove_price(&self, asset: &AssetId) {
        let mut prices = self.prices.write().unwrap_or_else(|e| e.into_inner());
        prices.remove(asset);
    }

    /// Get number of configured assets
    pub fn asset_count(&self) -> usize {
        self.prices.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl PriceOracle for MockOracle {
    fn get_price(&self, asset: &AssetId) -> Result<Price, OracleError> {
        let prices = self.prices.read().unwrap_or_else(|e| e.into_inner());
        prices
            .get(asset)
            .cloned()
            .ok_or_else(|| OracleError::PriceUnavailable {
                asset: asset.clone(),
            })
    }

    fn supported_assets(&self) -> Vec<AssetId> {
        let prices = self.prices.read().unwrap_or_else(|e| e.into_inner());
        let mut assets: Vec<AssetId> = prices.keys().cloned().collect();
        assets.sort();
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn asset(code: &str) -> AssetId {
        code.parse().unwrap()
    }

    #[test]
    fn test_mock_oracle_set_price() {
        let oracle = MockOracle::new();
        let weth = asset("WETH");

        // Initially not set
        assert!(oracle.live_price(&weth).is_err());

        let price = Wad::from_decimal(dec!(3000)).unwrap();
        oracle.set_price(weth.clone(), price);

        assert_eq!(oracle.live_price(&weth).unwrap(), price);
        assert_eq!(oracle.get_price(&weth).unwrap().source, "mock");
    }

    #[test]
    fn test_mock_oracle_price_unavailable() {
        let oracle = MockOracle::new();
        let result = oracle.live_price(&asset("UNKNOWN"));
        assert!(matches!(result, Err(OracleError::PriceUnavailable { .. })));
    }

    #[test]
    fn test_zero_price_rejected() {
        let oracle = MockOracle::with_prices([(asset("COMP"), Wad::ZERO)]);
        let result = oracle.live_price(&asset("COMP"));
        assert!(matches!(result, Err(OracleError::InvalidPrice { .. })));
    }

    #[test]
    fn test_supported_assets_sorted() {
        let oracle = MockOracle::with_prices([
            (asset("WETH"), Wad::ONE),
            (asset("COMP"), Wad::ONE),
        ]);
        assert_eq!(oracle.supported_assets(), vec![asset("COMP"), asset("WETH")]);
        assert!(oracle.is_supported(&asset("WETH")));

        oracle.remove_price(&asset("WETH"));
        assert_eq!(oracle.asset_count(), 1);
        assert!(!oracle.is_supported(&asset("WETH")));
    }
}
