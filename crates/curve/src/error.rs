//! Curve error types

use usdi_core::{AssetId, MathError, Wad};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// Input outside the 0..=1e18 domain
    #[error("Curve input out of range: {0}")]
    OutOfRange(Wad),

    /// Breakpoints must satisfy 0 < s1 < s2 <= 1e18
    #[error("Invalid curve breakpoints: s1 = {s1}, s2 = {s2}")]
    InvalidBreakpoints { s1: Wad, s2: Wad },

    #[error("No curve registered for {0}")]
    NotEnabled(AssetId),

    #[error(transparent)]
    Math(#[from] MathError),
}
