//! Wad - 18-decimal fixed-point wrapper over a 256-bit unsigned integer
//!
//! Every product or quotient that rescales by 1e18 truncates toward zero.
//! The rounding direction is part of the observable contract, so callers must
//! go through `mul_trunc` / `div_trunc` / `mul_div` rather than raw operators.

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of decimals carried by a [`Wad`]
pub const WAD_DECIMALS: u32 = 18;

const WAD_RAW: u64 = 1_000_000_000_000_000_000;

/// Errors raised by fixed-point arithmetic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Arithmetic underflow in {0}")]
    Underflow(&'static str),

    #[error("Division by zero in {0}")]
    DivisionByZero(&'static str),

    #[error("Value cannot be negative: {0}")]
    NegativeDecimal(Decimal),

    #[error("Invalid fixed-point literal: {0}")]
    Parse(String),
}

/// `a * b / d` with a single truncating division.
pub fn mul_div(a: U256, b: U256, d: U256) -> Result<U256, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero("mul_div"));
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow("mul_div"))?;
    Ok(product / d)
}

/// Checked integer product.
pub fn checked_mul(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow("mul"))
}

/// Checked truncating quotient.
pub fn checked_div(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_div(b).ok_or(MathError::DivisionByZero("div"))
}

/// `10^exp` as a 256-bit integer.
pub fn pow10(exp: u32) -> Result<U256, MathError> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or(MathError::Overflow("pow10"))
}

/// An 18-decimal fixed-point value (1.0 is represented as `1e18`).
///
/// The same type carries token amounts already normalized to 18 decimals,
/// prices, rates and the interest factor.
///
/// # Example
/// ```
/// use usdi_core::Wad;
///
/// let half = Wad::from_raw_u128(500_000_000_000_000_000);
/// let amount = Wad::from_units(10).unwrap();
/// assert_eq!(amount.mul_trunc(half).unwrap(), Wad::from_units(5).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Wad(U256);

impl Wad {
    pub const ZERO: Self = Self(U256::ZERO);

    /// 1.0
    pub const ONE: Self = Self(U256::from_limbs([WAD_RAW, 0, 0, 0]));

    /// Wrap a raw 256-bit value (already scaled by 1e18)
    #[inline]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Wrap a raw `u128` value (already scaled by 1e18)
    #[inline]
    pub fn from_raw_u128(raw: u128) -> Self {
        Self(U256::from(raw))
    }

    /// Whole units, e.g. `from_units(5000)` is 5000e18
    pub fn from_units(units: u64) -> Result<Self, MathError> {
        U256::from(units)
            .checked_mul(Self::ONE.0)
            .map(Self)
            .ok_or(MathError::Overflow("from_units"))
    }

    /// Convert a decimal fraction into a wad, truncating past 18 decimals.
    pub fn from_decimal(value: Decimal) -> Result<Self, MathError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MathError::NegativeDecimal(value));
        }
        let truncated = value.round_dp_with_strategy(WAD_DECIMALS, RoundingStrategy::ToZero);
        let mantissa = U256::from(truncated.mantissa().unsigned_abs());
        let scale = pow10(WAD_DECIMALS - truncated.scale())?;
        mantissa
            .checked_mul(scale)
            .map(Self)
            .ok_or(MathError::Overflow("from_decimal"))
    }

    /// Lossless conversion to `Decimal` when the value fits its 96-bit mantissa
    pub fn to_decimal(&self) -> Option<Decimal> {
        let raw = u128::try_from(self.0).ok()?;
        let raw = i128::try_from(raw).ok()?;
        Decimal::try_from_i128_with_scale(raw, WAD_DECIMALS)
            .ok()
            .map(|d| d.normalize())
    }

    #[inline]
    pub const fn raw(&self) -> U256 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Wad) -> Result<Wad, MathError> {
        self.0
            .checked_add(other.0)
            .map(Wad)
            .ok_or(MathError::Overflow("add"))
    }

    pub fn checked_sub(self, other: Wad) -> Result<Wad, MathError> {
        self.0
            .checked_sub(other.0)
            .map(Wad)
            .ok_or(MathError::Underflow("sub"))
    }

    pub fn saturating_sub(self, other: Wad) -> Wad {
        Wad(self.0.saturating_sub(other.0))
    }

    /// `truncate(self * other / 1e18)`
    pub fn mul_trunc(self, other: Wad) -> Result<Wad, MathError> {
        mul_div(self.0, other.0, Self::ONE.0).map(Wad)
    }

    /// `truncate(self * 1e18 / other)`
    pub fn div_trunc(self, other: Wad) -> Result<Wad, MathError> {
        mul_div(self.0, Self::ONE.0, other.0).map(Wad)
    }

    /// `truncate(self * mul / div)` on raw values
    pub fn mul_div(self, mul: Wad, div: Wad) -> Result<Wad, MathError> {
        mul_div(self.0, mul.0, div.0).map(Wad)
    }

    /// Integer product, no rescaling
    pub fn mul_int(self, factor: u64) -> Result<Wad, MathError> {
        checked_mul(self.0, U256::from(factor)).map(Wad)
    }

    /// Integer quotient, no rescaling
    pub fn div_int(self, divisor: u64) -> Result<Wad, MathError> {
        checked_div(self.0, U256::from(divisor)).map(Wad)
    }

    /// Normalize an amount expressed in `decimals` native decimals to 18 decimals.
    pub fn from_native(amount: U256, decimals: u8) -> Result<Wad, MathError> {
        let decimals = u32::from(decimals);
        if decimals <= WAD_DECIMALS {
            checked_mul(amount, pow10(WAD_DECIMALS - decimals)?).map(Wad)
        } else {
            checked_div(amount, pow10(decimals - WAD_DECIMALS)?).map(Wad)
        }
    }

    /// Express an 18-decimal amount in `decimals` native decimals, truncating.
    pub fn to_native(self, decimals: u8) -> Result<U256, MathError> {
        let decimals = u32::from(decimals);
        if decimals <= WAD_DECIMALS {
            checked_div(self.0, pow10(WAD_DECIMALS - decimals)?)
        } else {
            checked_mul(self.0, pow10(decimals - WAD_DECIMALS)?)
        }
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Wad {
    type Err = MathError;

    /// Parses a raw base-10 integer (already scaled by 1e18)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(MathError::Parse(s.to_string()));
        }
        U256::from_str_radix(s, 10)
            .map(Wad)
            .map_err(|_| MathError::Parse(s.to_string()))
    }
}

impl TryFrom<String> for Wad {
    type Error = MathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Wad> for String {
    fn from(value: Wad) -> Self {
        value.to_string()
    }
}

impl From<U256> for Wad {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<Wad> for U256 {
    fn from(value: Wad) -> Self {
        value.0
    }
}
