//! USDi Core - Domain types
//!
//! This crate contains the fundamental types used across the USDi ledger:
//! - `Wad`: 18-decimal truncating fixed-point value
//! - `VaultId`, `AccountId`, `AssetId`: identifiers
//! - `Clock`: the time source consumed by interest accrual
//! - `serde_u256`: decimal-string encoding for native token amounts

pub mod ids;
pub mod serde_u256;
pub mod time;
pub mod wad;

pub use alloy_primitives::U256;
pub use ids::{AccountId, AssetId, IdError, VaultId};
pub use time::{Clock, ClockError, ManualClock, ONE_DAY, ONE_WEEK, SECONDS_PER_YEAR};
pub use wad::{MathError, Wad, WAD_DECIMALS};
