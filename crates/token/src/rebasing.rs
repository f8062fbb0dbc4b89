//! Rebasing USDi ledger
//!
//! External balance = gons / gonsPerFragment. Interest is distributed by
//! raising `total_supply` without minting gons, which lowers
//! `gons_per_fragment` and grows every holder's balance at once.
//!
//! # Invariants
//! - `gons_per_fragment` changes only inside [`UsdiLedger::distribute`].
//! - `Σ balance_of(holder) == total_supply` up to one unit per holder.

use std::collections::HashMap;

use tracing::{debug, warn};
use usdi_core::wad::{checked_div, checked_mul};
use usdi_core::{AccountId, MathError, Wad, U256};

use crate::error::{TokenError, TokenResult};

/// Decimals of the reserve asset (USDC)
pub const USDC_DECIMALS: u8 = 6;

/// Supply minted to the genesis holder: one USDi
const INITIAL_FRAGMENTS_SUPPLY: u128 = 1_000_000_000_000_000_000;

/// Initial gons per fragment, 1e48
fn initial_gons_per_fragment() -> U256 {
    U256::from(10u128.pow(36)) * U256::from(10u64.pow(12))
}

fn max_supply() -> Wad {
    Wad::from_raw_u128(u128::MAX)
}

/// Split of one interest distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distribution {
    /// Minted to the protocol owner
    pub protocol_amount: Wad,
    /// Spread across all holders through the ratio
    pub donation_amount: Wad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsdiLedger {
    gon_balances: HashMap<AccountId, U256>,
    total_gons: U256,
    total_supply: Wad,
    gons_per_fragment: U256,
    /// USDC held in reserve, native 6 decimals
    reserve: U256,
}

impl UsdiLedger {
    /// Genesis ledger: one USDi held by `genesis_holder`
    pub fn new(genesis_holder: AccountId) -> Self {
        let gons_per_fragment = initial_gons_per_fragment();
        let total_supply = Wad::from_raw_u128(INITIAL_FRAGMENTS_SUPPLY);
        let total_gons = total_supply.raw() * gons_per_fragment;

        let mut gon_balances = HashMap::new();
        gon_balances.insert(genesis_holder, total_gons);

        Self {
            gon_balances,
            total_gons,
            total_supply,
            gons_per_fragment,
            reserve: U256::ZERO,
        }
    }

    pub fn total_supply(&self) -> Wad {
        self.total_supply
    }

    pub fn total_gons(&self) -> U256 {
        self.total_gons
    }

    pub fn gons_per_fragment(&self) -> U256 {
        self.gons_per_fragment
    }

    /// USDC held in reserve (6 decimals)
    pub fn reserve_amount(&self) -> U256 {
        self.reserve
    }

    /// Internal gon balance
    pub fn scaled_balance_of(&self, account: &AccountId) -> U256 {
        self.gon_balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    /// External balance, truncated toward zero
    pub fn balance_of(&self, account: &AccountId) -> Wad {
        // gons_per_fragment is never zero: total_gons >= total_supply always
        Wad::from_raw(self.scaled_balance_of(account) / self.gons_per_fragment)
    }

    /// Holders with a non-zero gon balance
    pub fn holders(&self) -> impl Iterator<Item = &AccountId> {
        self.gon_balances
            .iter()
            .filter(|(_, gons)| !gons.is_zero())
            .map(|(account, _)| account)
    }

    /// `truncate(reserve * 1e12 * 1e18 / total_supply)`, zero when nothing is issued
    pub fn reserve_ratio(&self) -> Result<Wad, MathError> {
        if self.total_supply.is_zero() {
            return Ok(Wad::ZERO);
        }
        let reserve = Wad::from_native(self.reserve, USDC_DECIMALS)?;
        reserve.mul_div(Wad::ONE, self.total_supply)
    }

    fn gons_for(&self, amount: Wad) -> TokenResult<U256> {
        Ok(checked_mul(amount.raw(), self.gons_per_fragment)?)
    }

    fn insufficient(&self, account: &AccountId, required: Wad) -> TokenError {
        TokenError::InsufficientBalance {
            asset: "USDI".to_string(),
            account: account.clone(),
            available: self.balance_of(account).to_string(),
            required: required.to_string(),
        }
    }

    /// Mint at the current ratio; the ratio is not recomputed
    pub fn mint(&mut self, to: &AccountId, amount: Wad) -> TokenResult<()> {
        let gons = self.gons_for(amount)?;
        let supply = self.total_supply.checked_add(amount)?;
        if supply > max_supply() {
            return Err(TokenError::SupplyCapExceeded);
        }
        let total_gons = self
            .total_gons
            .checked_add(gons)
            .ok_or(MathError::Overflow("mint"))?;
        let balance = self
            .scaled_balance_of(to)
            .checked_add(gons)
            .ok_or(MathError::Overflow("mint"))?;

        self.total_supply = supply;
        self.total_gons = total_gons;
        self.gon_balances.insert(to.clone(), balance);
        Ok(())
    }

    /// Burn at the current ratio; the ratio is not recomputed
    pub fn burn(&mut self, from: &AccountId, amount: Wad) -> TokenResult<()> {
        let gons = self.gons_for(amount)?;
        let balance = self.scaled_balance_of(from);
        if balance < gons {
            return Err(self.insufficient(from, amount));
        }

        self.gon_balances.insert(from.clone(), balance - gons);
        self.total_gons = self.total_gons.saturating_sub(gons);
        self.total_supply = self.total_supply.saturating_sub(amount);
        Ok(())
    }

    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Wad) -> TokenResult<()> {
        let gons = self.gons_for(amount)?;
        let from_balance = self.scaled_balance_of(from);
        if from_balance < gons {
            return Err(self.insufficient(from, amount));
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .scaled_balance_of(to)
            .checked_add(gons)
            .ok_or(MathError::Overflow("transfer"))?;

        self.gon_balances.insert(from.clone(), from_balance - gons);
        self.gon_balances.insert(to.clone(), to_balance);
        Ok(())
    }

    /// Distribute accrued interest.
    ///
    /// `protocol_fee` of the delta is minted to `protocol_account`; the rest
    /// raises the supply and `gons_per_fragment` is recomputed exactly once.
    /// The donation stops at the supply cap and the returned split reports
    /// what was applied. A zero delta leaves the ledger untouched.
    pub fn distribute(
        &mut self,
        interest_delta: Wad,
        protocol_fee: Wad,
        protocol_account: &AccountId,
    ) -> TokenResult<Distribution> {
        if interest_delta.is_zero() {
            return Ok(Distribution::default());
        }

        let protocol_amount = interest_delta.mul_trunc(protocol_fee)?;
        let accrued_donation = interest_delta.checked_sub(protocol_amount)?;

        // Only the part that fits under the supply cap is donated
        let donation_amount = accrued_donation.min(max_supply().saturating_sub(self.total_supply));
        if donation_amount < accrued_donation {
            warn!(
                accrued = %accrued_donation,
                applied = %donation_amount,
                "Donation clamped at the supply cap"
            );
        }

        let donated_supply = self.total_supply.checked_add(donation_amount)?;
        let gons_per_fragment = checked_div(self.total_gons, donated_supply.raw())?;

        let protocol_gons = checked_mul(protocol_amount.raw(), gons_per_fragment)?;
        let supply = donated_supply.checked_add(protocol_amount)?;
        if supply > max_supply() {
            return Err(TokenError::SupplyCapExceeded);
        }
        let total_gons = self
            .total_gons
            .checked_add(protocol_gons)
            .ok_or(MathError::Overflow("distribute"))?;
        let protocol_balance = self
            .scaled_balance_of(protocol_account)
            .checked_add(protocol_gons)
            .ok_or(MathError::Overflow("distribute"))?;

        self.gons_per_fragment = gons_per_fragment;
        self.total_supply = supply;
        self.total_gons = total_gons;
        self.gon_balances
            .insert(protocol_account.clone(), protocol_balance);

        debug!(
            donation = %donation_amount,
            protocol = %protocol_amount,
            gons_per_fragment = %gons_per_fragment,
            "Distributed interest"
        );

        Ok(Distribution {
            protocol_amount,
            donation_amount,
        })
    }

    /// Take `usdc_amount` (6 decimals) into reserve and mint the USDi equivalent
    pub fn deposit_reserve(&mut self, to: &AccountId, usdc_amount: U256) -> TokenResult<Wad> {
        let amount = Wad::from_native(usdc_amount, USDC_DECIMALS)?;
        let reserve = self
            .reserve
            .checked_add(usdc_amount)
            .ok_or(MathError::Overflow("deposit_reserve"))?;
        self.mint(to, amount)?;
        self.reserve = reserve;
        Ok(amount)
    }

    /// Burn the USDi equivalent of `usdc_amount` and release it from reserve
    pub fn withdraw_reserve(&mut self, from: &AccountId, usdc_amount: U256) -> TokenResult<Wad> {
        if usdc_amount > self.reserve {
            return Err(TokenError::InsufficientReserve {
                available: self.reserve.to_string(),
                required: usdc_amount.to_string(),
            });
        }
        let amount = Wad::from_native(usdc_amount, USDC_DECIMALS)?;
        self.burn(from, amount)?;
        self.reserve -= usdc_amount;
        Ok(amount)
    }

    /// Expected balance of `account` if `donation` were distributed now
    pub fn preview_balance_after_donation(
        &self,
        account: &AccountId,
        donation: Wad,
    ) -> Result<Wad, MathError> {
        let supply = self.total_supply.checked_add(donation)?.min(max_supply());
        let gons_per_fragment = checked_div(self.total_gons, supply.raw())?;
        checked_div(self.scaled_balance_of(account), gons_per_fragment).map(Wad::from_raw)
    }
}
