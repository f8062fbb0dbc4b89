//! USDi Price Oracle
//!
//! Provides live collateral prices for borrowing power and liquidation math.
//! Prices are 18-decimal USD values per whole token and are read synchronously.

mod error;
mod mock;
mod types;

pub use error::OracleError;
pub use mock::MockOracle;
pub use types::{Price, PriceOracle};
