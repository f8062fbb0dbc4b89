//! USDi Vault Controller
//!
//! Interest accrual, liability accounting and liquidation for the USDi
//! protocol. [`VaultController`] is the single serialized entry point:
//! every mutating operation pays interest first and commits atomically.
//!
//! - `interest`: the interest factor engine
//! - `liability`: base liability math, collateral registration
//! - `liquidation`: pure liquidation pricing
//! - `state`: the protocol state owned by the controller
//! - `events`: per-operation results and their journaled form

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod interest;
pub mod liability;
pub mod liquidation;
pub mod state;

pub use config::{CollateralConfig, ConfigError, CurveConfig, ProtocolConfig};
pub use controller::VaultController;
pub use error::{VaultError, VaultResult};
pub use events::{
    BorrowEvent, CollateralEvent, InterestEvent, LiquidationEvent, ProtocolEvent, RepayEvent,
    ReserveEvent, VaultMintedEvent,
};
pub use interest::InterestEngine;
pub use liability::{CollateralAsset, Vault, VaultStatus};
pub use liquidation::LiquidationQuote;
pub use state::ProtocolState;
