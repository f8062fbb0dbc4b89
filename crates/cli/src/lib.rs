//! USDi Simulator - scenario runner
//!
//! Drives the vault controller through simulated time from a scenario file
//! and journals every committed event.

pub mod commands;
pub mod context;
pub mod scenario;

pub use context::AppContext;
pub use scenario::{Action, Scenario, Step};
