//! USDi Token Ledgers
//!
//! - `UsdiLedger`: the rebasing stablecoin. Balances are stored as gons and
//!   read through a global gons-per-fragment ratio, so distributing interest is
//!   a single O(1) update regardless of the number of holders.
//! - `Erc20Ledger`: plain fungible balances in native decimals, used for
//!   collateral assets and the USDC reserve asset.

pub mod erc20;
pub mod error;
pub mod rebasing;

pub use erc20::{Erc20Ledger, TokenLedger};
pub use error::{TokenError, TokenResult};
pub use rebasing::{Distribution, UsdiLedger, USDC_DECIMALS};
