//! Oracle error types

use thiserror::Error;
use usdi_core::AssetId;

/// Oracle-related errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// No price configured for the asset
    #[error("Price unavailable for {asset}")]
    PriceUnavailable { asset: AssetId },

    /// Zero or otherwise unusable price
    #[error("Invalid price for {asset}: {reason}")]
    InvalidPrice { asset: AssetId, reason: String },
}
