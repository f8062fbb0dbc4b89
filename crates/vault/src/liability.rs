//! Liability accounting
//!
//! A vault stores principal as `base_liability`, normalized by the interest
//! factor at borrow time. Its current liability is
//! `truncate(base_liability * factor / 1e18)`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use usdi_core::{AccountId, AssetId, MathError, VaultId, Wad, U256};

/// Collateral registration, set by the administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralAsset {
    pub asset: AssetId,
    /// Native token decimals
    pub decimals: u8,
    /// Loan-to-value, 1e18 scale
    pub ltv: Wad,
    /// Liquidation incentive, 1e18 scale
    pub liquidation_incentive: Wad,
}

impl CollateralAsset {
    /// Native balance normalized to 18 decimals
    pub fn normalize(&self, balance: U256) -> Result<Wad, MathError> {
        Wad::from_native(balance, self.decimals)
    }

    /// `truncate(truncate(balance * price) * ltv)`
    pub fn borrowing_power(&self, balance: U256, price: Wad) -> Result<Wad, MathError> {
        self.normalize(balance)?.mul_trunc(price)?.mul_trunc(self.ltv)
    }
}

/// Derived vault state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaultStatus {
    NoDebt,
    Borrowed,
    Liquidatable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: VaultId,
    pub minter: AccountId,
    pub base_liability: Wad,
}

impl Vault {
    pub fn new(id: VaultId, minter: AccountId) -> Self {
        Self {
            id,
            minter,
            base_liability: Wad::ZERO,
        }
    }

    /// Account holding this vault's collateral
    pub fn account(&self) -> AccountId {
        self.id.account()
    }

    pub fn liability(&self, factor: Wad) -> Result<Wad, MathError> {
        liability_of(self.base_liability, factor)
    }

    pub fn has_debt(&self) -> bool {
        !self.base_liability.is_zero()
    }
}

/// `truncate(amount * 1e18 / factor)`
pub fn base_amount(amount: Wad, factor: Wad) -> Result<Wad, MathError> {
    amount.div_trunc(factor)
}

/// `truncate(base * factor / 1e18)`
pub fn liability_of(base: Wad, factor: Wad) -> Result<Wad, MathError> {
    base.mul_trunc(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wad(value: rust_decimal::Decimal) -> Wad {
        Wad::from_decimal(value).unwrap()
    }

    fn weth() -> CollateralAsset {
        CollateralAsset {
            asset: "WETH".parse().unwrap(),
            decimals: 18,
            ltv: wad(dec!(0.85)),
            liquidation_incentive: wad(dec!(0.05)),
        }
    }

    #[test]
    fn test_round_trip_at_unit_factor() {
        let borrowed = wad(dec!(5000));
        let base = base_amount(borrowed, Wad::ONE).unwrap();
        assert_eq!(liability_of(base, Wad::ONE).unwrap(), borrowed);
    }

    #[test]
    fn test_round_trip_within_rounding() {
        let factor = Wad::from_raw_u128(1_000_123_456_789_012_345);
        let borrowed = wad(dec!(1234.567));
        let base = base_amount(borrowed, factor).unwrap();
        let liability = liability_of(base, factor).unwrap();
        assert!(liability <= borrowed);
        // Deficit is at most ceil((factor - 1) / 1e18) units
        assert!(borrowed.checked_sub(liability).unwrap() <= Wad::from_raw_u128(2));
    }

    #[test]
    fn test_liability_grows_with_factor() {
        let vault = Vault {
            base_liability: wad(dec!(100)),
            ..Vault::new(VaultId(1), AccountId::new("bob").unwrap())
        };
        assert_eq!(vault.liability(wad(dec!(1.5))).unwrap(), wad(dec!(150)));
        assert!(vault.has_debt());
        assert_eq!(vault.account().as_str(), "vault#1");
    }

    #[test]
    fn test_borrowing_power() {
        // 10 WETH at $3000, 85% LTV
        let balance = U256::from(10u64) * Wad::ONE.raw();
        let power = weth().borrowing_power(balance, wad(dec!(3000))).unwrap();
        assert_eq!(power, wad(dec!(25500)));
    }

    #[test]
    fn test_borrowing_power_six_decimals() {
        let usdc = CollateralAsset {
            asset: "USDC".parse().unwrap(),
            decimals: 6,
            ..weth()
        };
        let power = usdc
            .borrowing_power(U256::from(1_000_000u64), Wad::ONE)
            .unwrap();
        assert_eq!(power, wad(dec!(0.85)));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(VaultStatus::NoDebt.to_string(), "NO_DEBT");
        assert_eq!("LIQUIDATABLE".parse::<VaultStatus>().unwrap(), VaultStatus::Liquidatable);
    }
}
