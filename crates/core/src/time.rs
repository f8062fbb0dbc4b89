//! Time source for interest accrual

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// 365 days + 6 hours
pub const SECONDS_PER_YEAR: u64 = 31_557_600;
pub const ONE_WEEK: u64 = 60 * 60 * 24 * 7;
pub const ONE_DAY: u64 = 60 * 60 * 24;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Clock cannot move backwards: now {now}, requested {requested}")]
    Regression { now: u64, requested: u64 },

    #[error("Clock overflow: now {now}, advance by {secs}")]
    Overflow { now: u64, secs: u64 },
}

/// Monotonic non-decreasing source of unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Manually driven clock for simulations and tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move forward by `secs`, returning the new time
    pub fn advance(&self, secs: u64) -> Result<u64, ClockError> {
        self.now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| now.checked_add(secs))
            .map(|previous| previous + secs)
            .map_err(|now| ClockError::Overflow { now, secs })
    }

    /// Jump to an absolute time; going backwards is rejected
    pub fn set(&self, time: u64) -> Result<(), ClockError> {
        let now = self.now.load(Ordering::SeqCst);
        if time < now {
            return Err(ClockError::Regression {
                now,
                requested: time,
            });
        }
        self.now.store(time, Ordering::SeqCst);
        Ok(())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
