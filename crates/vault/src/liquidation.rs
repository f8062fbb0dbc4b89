//! Liquidation evaluator
//!
//! Pure pricing of a liquidation. The controller supplies the vault's
//! liability, borrowing power and collateral balance, and applies the quote.
//!
//! Truncation order:
//! 1. `bad_fill = truncate(price * 1e18 / (1e18 + incentive))`
//! 2. `denominator = bad_fill - truncate(price * ltv)`
//! 3. `max_to_solvency = truncate(shortfall * 1e18 / denominator)`, unbounded
//!    when the denominator is not positive
//! 4. tokens = min(max_tokens, max_to_solvency, balance) in native decimals
//! 5. `usdi = truncate(bad_fill * tokens18)`

use serde::{Deserialize, Serialize};
use usdi_core::{MathError, Wad, U256};

use crate::liability::CollateralAsset;

/// Inputs for one liquidation quote
#[derive(Debug, Clone, Copy)]
pub struct LiquidationInput<'a> {
    pub collateral: &'a CollateralAsset,
    pub price: Wad,
    pub liability: Wad,
    pub borrowing_power: Wad,
    /// Vault balance of the asset, native decimals
    pub vault_balance: U256,
    /// Liquidator's cap, native decimals
    pub max_tokens: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationQuote {
    /// Tokens moved to the liquidator, native decimals
    #[serde(with = "usdi_core::serde_u256")]
    pub tokens: U256,
    /// USDi the liquidator pays
    pub usdi_to_repurchase: Wad,
    /// Price per token paid by the liquidator
    pub bad_fill_price: Wad,
}

/// Price discounted by the incentive, `price / (1 + incentive)`
pub fn bad_fill_price(price: Wad, incentive: Wad) -> Result<Wad, MathError> {
    price.mul_div(Wad::ONE, Wad::ONE.checked_add(incentive)?)
}

/// Tokens (18 decimals) that bring the vault back to solvency, `None` if unbounded
pub fn tokens_to_solvency(
    shortfall: Wad,
    price: Wad,
    ltv: Wad,
    bad_fill: Wad,
) -> Result<Option<Wad>, MathError> {
    let denominator = bad_fill.saturating_sub(price.mul_trunc(ltv)?);
    if denominator.is_zero() {
        return Ok(None);
    }
    shortfall.div_trunc(denominator).map(Some)
}

pub fn quote(input: LiquidationInput<'_>) -> Result<LiquidationQuote, MathError> {
    let collateral = input.collateral;
    let bad_fill = bad_fill_price(input.price, collateral.liquidation_incentive)?;
    let shortfall = input.liability.saturating_sub(input.borrowing_power);

    let mut tokens = input.max_tokens.min(input.vault_balance);
    if let Some(to_solvency) = tokens_to_solvency(shortfall, input.price, collateral.ltv, bad_fill)? {
        tokens = tokens.min(to_solvency.to_native(collateral.decimals)?);
    }

    let usdi_to_repurchase = bad_fill.mul_trunc(collateral.normalize(tokens)?)?;
    Ok(LiquidationQuote {
        tokens,
        usdi_to_repurchase,
        bad_fill_price: bad_fill,
    })
}
