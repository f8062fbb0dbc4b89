//! Fungible token ledger in native decimals

use std::collections::HashMap;

use usdi_core::{AccountId, AssetId, MathError, U256};

use crate::error::{TokenError, TokenResult};

/// Standard fungible-asset operations, truncating integer arithmetic
pub trait TokenLedger {
    fn asset(&self) -> &AssetId;
    fn decimals(&self) -> u8;
    fn total_supply(&self) -> U256;
    fn balance_of(&self, account: &AccountId) -> U256;
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: U256) -> TokenResult<()>;
    fn mint(&mut self, to: &AccountId, amount: U256) -> TokenResult<()>;
    fn burn(&mut self, from: &AccountId, amount: U256) -> TokenResult<()>;
}

/// In-memory fungible ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Ledger {
    asset: AssetId,
    decimals: u8,
    balances: HashMap<AccountId, U256>,
    total_supply: U256,
}

impl Erc20Ledger {
    pub fn new(asset: AssetId, decimals: u8) -> Self {
        Self {
            asset,
            decimals,
            balances: HashMap::new(),
            total_supply: U256::ZERO,
        }
    }

    /// Holders with a non-zero balance
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &U256)> {
        self.balances.iter().filter(|(_, balance)| !balance.is_zero())
    }

    fn debit_check(&self, from: &AccountId, amount: U256) -> TokenResult<U256> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                asset: self.asset.to_string(),
                account: from.clone(),
                available: available.to_string(),
                required: amount.to_string(),
            });
        }
        Ok(available)
    }
}

impl TokenLedger for Erc20Ledger {
    fn asset(&self) -> &AssetId {
        &self.asset
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: U256) -> TokenResult<()> {
        let available = self.debit_check(from, amount)?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(MathError::Overflow("transfer"))?;
        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    fn mint(&mut self, to: &AccountId, amount: U256) -> TokenResult<()> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(MathError::Overflow("mint"))?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(MathError::Overflow("mint"))?;
        self.total_supply = supply;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }

    fn burn(&mut self, from: &AccountId, amount: U256) -> TokenResult<()> {
        let available = self.debit_check(from, amount)?;
        self.balances.insert(from.clone(), available - amount);
        self.total_supply = self.total_supply.saturating_sub(amount);
        Ok(())
    }
}
