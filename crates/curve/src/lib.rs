//! USDi Pricing Curves
//!
//! Maps the USDi reserve ratio to an annual borrow rate. The protocol uses a
//! three-segment piecewise linear curve registered under a default key; other
//! keys can carry their own curves.

mod error;
mod master;
mod three_lines;

pub use error::CurveError;
pub use master::CurveMaster;
pub use three_lines::{Curve, ThreeLines};
