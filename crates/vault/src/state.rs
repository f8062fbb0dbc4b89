//! Protocol state owned by the vault controller
//!
//! Cloned at the start of every mutating operation and swapped back in only
//! when the operation succeeds.

use std::collections::BTreeMap;

use usdi_core::{AccountId, AssetId, VaultId, Wad};
use usdi_curve::CurveMaster;
use usdi_oracle::PriceOracle;
use usdi_token::{Erc20Ledger, TokenLedger, UsdiLedger, USDC_DECIMALS};

use crate::error::{VaultError, VaultResult};
use crate::interest::InterestEngine;
use crate::liability::{CollateralAsset, Vault, VaultStatus};

#[derive(Debug, Clone)]
pub struct ProtocolState {
    pub owner: AccountId,
    pub paused: bool,
    /// Share of each distribution minted to the owner, 1e18 scale
    pub protocol_fee: Wad,
    pub interest: InterestEngine,
    pub usdi: UsdiLedger,
    /// Native ledgers of collateral assets and USDC
    pub tokens: BTreeMap<AssetId, Erc20Ledger>,
    pub collateral: BTreeMap<AssetId, CollateralAsset>,
    pub vaults: BTreeMap<VaultId, Vault>,
    /// Always equals the sum of every vault's base liability
    pub total_base_liability: Wad,
    pub curves: CurveMaster,
    next_vault_id: u64,
}

impl ProtocolState {
    /// Genesis state: one USDi held by `owner`, factor 1e18, no vaults
    pub fn new(owner: AccountId, start_time: u64, protocol_fee: Wad, curves: CurveMaster) -> Self {
        let mut tokens = BTreeMap::new();
        tokens.insert(AssetId::usdc(), Erc20Ledger::new(AssetId::usdc(), USDC_DECIMALS));

        Self {
            usdi: UsdiLedger::new(owner.clone()),
            owner,
            paused: false,
            protocol_fee,
            interest: InterestEngine::new(start_time),
            tokens,
            collateral: BTreeMap::new(),
            vaults: BTreeMap::new(),
            total_base_liability: Wad::ZERO,
            curves,
            next_vault_id: 1,
        }
    }

    pub fn factor(&self) -> Wad {
        self.interest.factor()
    }

    pub fn vault(&self, id: VaultId) -> VaultResult<&Vault> {
        self.vaults.get(&id).ok_or(VaultError::VaultNotFound(id))
    }

    pub fn vault_mut(&mut self, id: VaultId) -> VaultResult<&mut Vault> {
        self.vaults.get_mut(&id).ok_or(VaultError::VaultNotFound(id))
    }

    /// Create a vault for `minter` with the next sequential id
    pub fn create_vault(&mut self, minter: AccountId) -> VaultId {
        let id = VaultId(self.next_vault_id);
        self.next_vault_id += 1;
        self.vaults.insert(id, Vault::new(id, minter));
        id
    }

    pub fn collateral(&self, asset: &AssetId) -> VaultResult<&CollateralAsset> {
        self.collateral
            .get(asset)
            .ok_or_else(|| VaultError::AssetNotRegistered(asset.clone()))
    }

    pub fn token(&self, asset: &AssetId) -> VaultResult<&Erc20Ledger> {
        self.tokens
            .get(asset)
            .ok_or_else(|| VaultError::AssetNotRegistered(asset.clone()))
    }

    pub fn token_mut(&mut self, asset: &AssetId) -> VaultResult<&mut Erc20Ledger> {
        self.tokens
            .get_mut(asset)
            .ok_or_else(|| VaultError::AssetNotRegistered(asset.clone()))
    }

    /// Register a collateral asset and open its token ledger
    pub fn register_collateral(&mut self, asset: CollateralAsset) -> VaultResult<()> {
        if self.collateral.contains_key(&asset.asset) {
            return Err(VaultError::AssetAlreadyRegistered(asset.asset));
        }
        match self.tokens.get(&asset.asset) {
            Some(ledger) if ledger.decimals() != asset.decimals => {
                return Err(VaultError::InvalidParameter(format!(
                    "{} ledger has {} decimals, registration says {}",
                    asset.asset,
                    ledger.decimals(),
                    asset.decimals
                )));
            }
            Some(_) => {}
            None => {
                self.tokens.insert(
                    asset.asset.clone(),
                    Erc20Ledger::new(asset.asset.clone(), asset.decimals),
                );
            }
        }
        self.collateral.insert(asset.asset.clone(), asset);
        Ok(())
    }

    pub fn liability(&self, id: VaultId) -> VaultResult<Wad> {
        Ok(self.vault(id)?.liability(self.factor())?)
    }

    /// Σ over registered assets of `truncate(truncate(balance * price) * ltv)`
    pub fn borrowing_power(&self, id: VaultId, oracle: &dyn PriceOracle) -> VaultResult<Wad> {
        let account = self.vault(id)?.account();
        let mut power = Wad::ZERO;
        for (asset, collateral) in &self.collateral {
            let balance = self.token(asset)?.balance_of(&account);
            if balance.is_zero() {
                continue;
            }
            let price = oracle.live_price(asset)?;
            power = power.checked_add(collateral.borrowing_power(balance, price)?)?;
        }
        Ok(power)
    }

    pub fn is_solvent(&self, id: VaultId, oracle: &dyn PriceOracle) -> VaultResult<bool> {
        Ok(self.liability(id)? <= self.borrowing_power(id, oracle)?)
    }

    pub fn status(&self, id: VaultId, oracle: &dyn PriceOracle) -> VaultResult<VaultStatus> {
        if !self.vault(id)?.has_debt() {
            return Ok(VaultStatus::NoDebt);
        }
        if self.is_solvent(id, oracle)? {
            Ok(VaultStatus::Borrowed)
        } else {
            Ok(VaultStatus::Liquidatable)
        }
    }

    /// Checks `total_base_liability == Σ base_liability`
    pub fn base_liability_consistent(&self) -> bool {
        let mut sum = Wad::ZERO;
        for vault in self.vaults.values() {
            match sum.checked_add(vault.base_liability) {
                Ok(next) => sum = next,
                Err(_) => return false,
            }
        }
        sum == self.total_base_liability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use usdi_core::U256;
    use usdi_oracle::MockOracle;

    fn account(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    fn weth() -> CollateralAsset {
        CollateralAsset {
            asset: "WETH".parse().unwrap(),
            decimals: 18,
            ltv: Wad::from_decimal(dec!(0.85)).unwrap(),
            liquidation_incentive: Wad::from_decimal(dec!(0.05)).unwrap(),
        }
    }

    fn state() -> ProtocolState {
        ProtocolState::new(account("owner"), 0, Wad::ZERO, CurveMaster::new())
    }

    #[test]
    fn test_vault_ids_are_sequential() {
        let mut state = state();
        assert_eq!(state.create_vault(account("bob")), VaultId(1));
        assert_eq!(state.create_vault(account("carol")), VaultId(2));
        assert!(matches!(
            state.vault(VaultId(3)),
            Err(VaultError::VaultNotFound(VaultId(3)))
        ));
    }

    #[test]
    fn test_register_collateral_twice() {
        let mut state = state();
        state.register_collateral(weth()).unwrap();
        assert!(matches!(
            state.register_collateral(weth()),
            Err(VaultError::AssetAlreadyRegistered(_))
        ));
        assert!(state.token(&"WETH".parse().unwrap()).is_ok());
    }

    #[test]
    fn test_register_existing_token_needs_matching_decimals() {
        let mut state = state();
        let usdc = CollateralAsset {
            asset: AssetId::usdc(),
            decimals: 18,
            ..weth()
        };
        assert!(matches!(
            state.register_collateral(usdc.clone()),
            Err(VaultError::InvalidParameter(_))
        ));
        assert!(state.collateral(&AssetId::usdc()).is_err());
        assert_eq!(state.token(&AssetId::usdc()).unwrap().decimals(), USDC_DECIMALS);

        state
            .register_collateral(CollateralAsset {
                decimals: USDC_DECIMALS,
                ..usdc
            })
            .unwrap();
        assert!(state.collateral(&AssetId::usdc()).is_ok());
    }

    #[test]
    fn test_borrowing_power_skips_empty_holdings() {
        let mut state = state();
        state.register_collateral(weth()).unwrap();
        let id = state.create_vault(account("bob"));

        // No price needed while the vault holds nothing
        let oracle = MockOracle::new();
        assert_eq!(state.borrowing_power(id, &oracle).unwrap(), Wad::ZERO);
        assert_eq!(state.status(id, &oracle).unwrap(), VaultStatus::NoDebt);

        let weth_id: AssetId = "WETH".parse().unwrap();
        state
            .token_mut(&weth_id)
            .unwrap()
            .mint(&id.account(), U256::from(10u64) * Wad::ONE.raw())
            .unwrap();
        assert!(state.borrowing_power(id, &oracle).is_err());

        oracle.set_price(weth_id, Wad::from_decimal(dec!(1000)).unwrap());
        assert_eq!(
            state.borrowing_power(id, &oracle).unwrap(),
            Wad::from_decimal(dec!(8500)).unwrap()
        );
        assert!(state.base_liability_consistent());
    }
}
