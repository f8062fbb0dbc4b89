//! Three-segment piecewise linear curve
//!
//! ```text
//! rate
//!  r0 |\
//!     | \
//!  r1 |  *
//!     |   `--.
//!  r2 |       *---------------
//!     +---+---+---------------+  reserve ratio
//!     0   s1  s2              1
//! ```

use std::fmt::Debug;

use usdi_core::wad::pow10;
use usdi_core::{MathError, Wad};

use crate::CurveError;

/// Pure, deterministic pricing curve
pub trait Curve: Send + Sync + Debug {
    /// Rate (1e18 = 100% per year) at input `x` in `0..=1e18`
    fn value_at(&self, x: Wad) -> Result<Wad, CurveError>;
}

/// Piecewise linear curve through `(0, r0)`, `(s1, r1)`, `(s2, r2)`,
/// flat at `r2` from `s2` to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreeLines {
    r0: Wad,
    r1: Wad,
    r2: Wad,
    s1: Wad,
    s2: Wad,
}

impl ThreeLines {
    pub fn new(r0: Wad, r1: Wad, r2: Wad, s1: Wad, s2: Wad) -> Result<Self, CurveError> {
        if s1.is_zero() || s1 >= s2 || s2 > Wad::ONE {
            return Err(CurveError::InvalidBreakpoints { s1, s2 });
        }
        Ok(Self { r0, r1, r2, s1, s2 })
    }

    pub fn breakpoints(&self) -> (Wad, Wad) {
        (self.s1, self.s2)
    }

    pub fn rates(&self) -> (Wad, Wad, Wad) {
        (self.r0, self.r1, self.r2)
    }
}

/// `from + rise * distance / run`, with the slope truncated at 24 decimals
/// and both truncations toward zero regardless of the sign of `rise`.
fn interpolate(from: Wad, to: Wad, run: Wad, distance: Wad) -> Result<Wad, MathError> {
    let e24 = Wad::from_raw(pow10(24)?);
    if to >= from {
        let slope = to.checked_sub(from)?.mul_div(e24, run)?;
        from.checked_add(slope.mul_div(distance, e24)?)
    } else {
        let slope = from.checked_sub(to)?.mul_div(e24, run)?;
        from.checked_sub(slope.mul_div(distance, e24)?)
    }
}

impl Curve for ThreeLines {
    fn value_at(&self, x: Wad) -> Result<Wad, CurveError> {
        if x > Wad::ONE {
            return Err(CurveError::OutOfRange(x));
        }
        if x < self.s1 {
            return Ok(interpolate(self.r0, self.r1, self.s1, x)?);
        }
        if x < self.s2 {
            let run = self.s2.checked_sub(self.s1)?;
            let distance = x.checked_sub(self.s1)?;
            return Ok(interpolate(self.r1, self.r2, run, distance)?);
        }
        Ok(self.r2)
    }
}
