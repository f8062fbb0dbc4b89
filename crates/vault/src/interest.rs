//! Interest factor engine
//!
//! The factor starts at 1e18 and only grows. Each accrual epoch compounds it
//! once with the rate read from the pricing curve:
//!
//! ```text
//! newFactor = F + truncate(truncate(elapsed * rate / YEAR) * F / 1e18)
//! ```

use serde::{Deserialize, Serialize};
use usdi_core::wad::mul_div;
use usdi_core::{MathError, Wad, SECONDS_PER_YEAR, U256};

use crate::error::{VaultError, VaultResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestEngine {
    factor: Wad,
    last_accrual_time: u64,
}

impl InterestEngine {
    /// Factor 1e18 with the first epoch starting at `start_time`
    pub fn new(start_time: u64) -> Self {
        Self {
            factor: Wad::ONE,
            last_accrual_time: start_time,
        }
    }

    pub fn factor(&self) -> Wad {
        self.factor
    }

    pub fn last_accrual_time(&self) -> u64 {
        self.last_accrual_time
    }

    /// Advance the factor to `now` at `rate` (annualized, 1e18 scale).
    ///
    /// Zero elapsed time returns the current factor unchanged.
    pub fn accrue(&mut self, now: u64, rate: Wad) -> VaultResult<Wad> {
        if now < self.last_accrual_time {
            return Err(VaultError::InvalidTime {
                current: now,
                last: self.last_accrual_time,
            });
        }
        let elapsed = now - self.last_accrual_time;
        if elapsed == 0 {
            return Ok(self.factor);
        }

        self.factor = compound(self.factor, elapsed, rate)?;
        self.last_accrual_time = now;
        Ok(self.factor)
    }

    /// Factor the next accrual at `now` would produce, without mutating
    pub fn preview(&self, now: u64, rate: Wad) -> VaultResult<Wad> {
        let mut engine = self.clone();
        engine.accrue(now, rate)
    }
}

/// One compounding step over `elapsed` seconds.
pub fn compound(factor: Wad, elapsed: u64, rate: Wad) -> Result<Wad, MathError> {
    // elapsed * 1e18 * rate / YEAR, truncated back to 1e18 scale
    let elapsed = Wad::from_units(elapsed)?;
    let scaled = mul_div(elapsed.raw(), rate.raw(), U256::from(SECONDS_PER_YEAR))?;
    let period_rate = Wad::from_raw(scaled).div_int(1_000_000_000_000_000_000)?;
    let growth = period_rate.mul_trunc(factor)?;
    factor.checked_add(growth)
}
