//! Vault controller
//!
//! The only writer of [`ProtocolState`]. Every mutating operation runs
//! against a draft copy: interest is paid first at the clock's current time,
//! then the operation itself. The draft replaces the live state only if the
//! whole operation succeeds.

use std::sync::Arc;

use tracing::{debug, info, warn};
use usdi_core::{AccountId, AssetId, Clock, VaultId, Wad, U256};
use usdi_curve::Curve;
use usdi_oracle::PriceOracle;
use usdi_token::TokenLedger;

use crate::config::{ConfigError, ProtocolConfig};
use crate::error::{VaultError, VaultResult};
use crate::events::{
    BorrowEvent, CollateralEvent, InterestEvent, LiquidationEvent, ProtocolEvent, RepayEvent,
    ReserveEvent, VaultMintedEvent,
};
use crate::liability::{base_amount, liability_of, CollateralAsset, Vault, VaultStatus};
use crate::liquidation::{self, LiquidationInput, LiquidationQuote};
use crate::state::ProtocolState;

pub struct VaultController {
    state: ProtocolState,
    clock: Arc<dyn Clock>,
    oracle: Arc<dyn PriceOracle>,
    /// Committed events not yet drained
    outbox: Vec<ProtocolEvent>,
}

/// Draft of a single operation
struct Transaction<'a> {
    state: ProtocolState,
    oracle: &'a dyn PriceOracle,
    now: u64,
    events: Vec<ProtocolEvent>,
}

fn nonzero_wad(amount: Wad, what: &str) -> VaultResult<()> {
    if amount.is_zero() {
        return Err(VaultError::InvalidAmount(format!("{what} is zero")));
    }
    Ok(())
}

fn nonzero_native(amount: U256, what: &str) -> VaultResult<()> {
    if amount.is_zero() {
        return Err(VaultError::InvalidAmount(format!("{what} is zero")));
    }
    Ok(())
}

fn below_one(value: Wad, what: &str) -> VaultResult<()> {
    if value >= Wad::ONE {
        return Err(VaultError::InvalidParameter(format!(
            "{what} must be below 1e18, got {value}"
        )));
    }
    Ok(())
}

/// Protocol-held accounts never act as callers
fn ensure_user(caller: &AccountId) -> VaultResult<()> {
    if caller.is_system() {
        return Err(VaultError::Unauthorized(caller.clone()));
    }
    Ok(())
}

/// Quote a liquidation against `state`; the vault must be insolvent
fn quote_liquidation(
    state: &ProtocolState,
    oracle: &dyn PriceOracle,
    vault_id: VaultId,
    asset: &AssetId,
    max_tokens: U256,
) -> VaultResult<LiquidationQuote> {
    nonzero_native(max_tokens, "max tokens")?;
    let account = state.vault(vault_id)?.account();
    let collateral = state.collateral(asset)?;

    let liability = state.liability(vault_id)?;
    let borrowing_power = state.borrowing_power(vault_id, oracle)?;
    if liability <= borrowing_power {
        return Err(VaultError::VaultSolvent(vault_id));
    }

    let quote = liquidation::quote(LiquidationInput {
        collateral,
        price: oracle.live_price(asset)?,
        liability,
        borrowing_power,
        vault_balance: state.token(asset)?.balance_of(&account),
        max_tokens,
    })?;
    Ok(quote)
}

impl Transaction<'_> {
    fn ensure_not_paused(&self) -> VaultResult<()> {
        if self.state.paused {
            return Err(VaultError::ProtocolPaused);
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: &AccountId) -> VaultResult<()> {
        if *caller != self.state.owner {
            return Err(VaultError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    fn ensure_minter(&self, vault_id: VaultId, caller: &AccountId) -> VaultResult<()> {
        if self.state.vault(vault_id)?.minter != *caller {
            return Err(VaultError::NotMinter {
                vault_id,
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn ensure_solvent(&self, vault_id: VaultId) -> VaultResult<()> {
        let liability = self.state.liability(vault_id)?;
        let power = self.state.borrowing_power(vault_id, self.oracle)?;
        if liability > power {
            return Err(VaultError::InsolventAccount {
                vault_id,
                liability,
                power,
            });
        }
        Ok(())
    }

    /// Accrue to `now` and distribute the interest delta to USDi holders
    fn pay_interest(&mut self) -> VaultResult<InterestEvent> {
        let state = &mut self.state;
        let factor_before = state.interest.factor();

        if self.now == state.interest.last_accrual_time() {
            return Ok(InterestEvent {
                epoch_time: self.now,
                rate: Wad::ZERO,
                factor_before,
                factor_after: factor_before,
                interest_delta: Wad::ZERO,
                protocol_amount: Wad::ZERO,
                donation_amount: Wad::ZERO,
            });
        }

        // A ratio above one is priced as fully reserved
        let ratio = state.usdi.reserve_ratio()?.min(Wad::ONE);
        let rate = state.curves.default_value_at(ratio)?;
        let factor_after = state.interest.accrue(self.now, rate)?;

        let total_base = state.total_base_liability;
        let interest_delta = total_base
            .mul_trunc(factor_after)?
            .checked_sub(total_base.mul_trunc(factor_before)?)?;
        let distribution = state
            .usdi
            .distribute(interest_delta, state.protocol_fee, &state.owner)?;

        debug!(
            epoch_time = self.now,
            rate = %rate,
            factor = %factor_after,
            interest = %interest_delta,
            "Paid interest"
        );

        let event = InterestEvent {
            epoch_time: self.now,
            rate,
            factor_before,
            factor_after,
            interest_delta,
            protocol_amount: distribution.protocol_amount,
            donation_amount: distribution.donation_amount,
        };
        if !interest_delta.is_zero() || factor_after != factor_before {
            self.events.push(ProtocolEvent::InterestPaid(event.clone()));
        }
        Ok(event)
    }

    fn borrow(&mut self, caller: &AccountId, vault_id: VaultId, amount: Wad) -> VaultResult<BorrowEvent> {
        nonzero_wad(amount, "borrow amount")?;
        self.ensure_minter(vault_id, caller)?;

        let factor = self.state.factor();
        let base = base_amount(amount, factor)?;
        let new_base = self.state.vault(vault_id)?.base_liability.checked_add(base)?;
        let liability = liability_of(new_base, factor)?;
        let power = self.state.borrowing_power(vault_id, self.oracle)?;
        if liability > power {
            return Err(VaultError::InsolventAccount {
                vault_id,
                liability,
                power,
            });
        }

        self.state.vault_mut(vault_id)?.base_liability = new_base;
        self.state.total_base_liability = self.state.total_base_liability.checked_add(base)?;
        self.state.usdi.mint(caller, amount)?;

        info!(vault_id = %vault_id, amount = %amount, base = %base, "Borrowed USDi");

        let event = BorrowEvent {
            vault_id,
            borrower: caller.clone(),
            amount,
            base_amount: base,
            liability,
            factor,
        };
        self.events.push(ProtocolEvent::Borrowed(event.clone()));
        Ok(event)
    }

    fn repay(&mut self, caller: &AccountId, vault_id: VaultId, amount: Wad) -> VaultResult<RepayEvent> {
        nonzero_wad(amount, "repay amount")?;
        let factor = self.state.factor();
        let reduction = base_amount(amount, factor)?;
        let base = self.state.vault(vault_id)?.base_liability;
        if reduction > base {
            return Err(VaultError::OverRepay { vault_id, amount });
        }

        self.state.usdi.burn(caller, amount)?;
        let new_base = base.checked_sub(reduction)?;
        self.state.vault_mut(vault_id)?.base_liability = new_base;
        self.state.total_base_liability = self.state.total_base_liability.checked_sub(reduction)?;

        info!(vault_id = %vault_id, amount = %amount, base_reduction = %reduction, "Repaid USDi");

        let event = RepayEvent {
            vault_id,
            payer: caller.clone(),
            amount,
            base_reduction: reduction,
            liability: liability_of(new_base, factor)?,
            factor,
            full: new_base.is_zero(),
        };
        self.events.push(ProtocolEvent::Repaid(event.clone()));
        Ok(event)
    }

    fn repay_all(&mut self, caller: &AccountId, vault_id: VaultId) -> VaultResult<RepayEvent> {
        let factor = self.state.factor();
        let base = self.state.vault(vault_id)?.base_liability;
        let owed = liability_of(base, factor)?;

        self.state.usdi.burn(caller, owed)?;
        self.state.vault_mut(vault_id)?.base_liability = Wad::ZERO;
        self.state.total_base_liability = self.state.total_base_liability.checked_sub(base)?;

        info!(vault_id = %vault_id, amount = %owed, "Repaid full liability");

        let event = RepayEvent {
            vault_id,
            payer: caller.clone(),
            amount: owed,
            base_reduction: base,
            liability: Wad::ZERO,
            factor,
            full: true,
        };
        self.events.push(ProtocolEvent::Repaid(event.clone()));
        Ok(event)
    }

    fn liquidate(
        &mut self,
        caller: &AccountId,
        vault_id: VaultId,
        asset: &AssetId,
        max_tokens: U256,
    ) -> VaultResult<LiquidationEvent> {
        let quote = quote_liquidation(&self.state, self.oracle, vault_id, asset, max_tokens)?;
        if quote.tokens.is_zero() {
            return Err(VaultError::InvalidAmount(format!(
                "vault {vault_id} holds no {asset} to liquidate"
            )));
        }

        let factor = self.state.factor();
        let base = self.state.vault(vault_id)?.base_liability;
        let reduction = base_amount(quote.usdi_to_repurchase, factor)?.min(base);
        let new_base = base.checked_sub(reduction)?;

        self.state.usdi.burn(caller, quote.usdi_to_repurchase)?;
        self.state.vault_mut(vault_id)?.base_liability = new_base;
        self.state.total_base_liability = self.state.total_base_liability.checked_sub(reduction)?;
        self.state
            .token_mut(asset)?
            .transfer(&vault_id.account(), caller, quote.tokens)?;

        info!(
            vault_id = %vault_id,
            asset = %asset,
            tokens = %quote.tokens,
            usdi = %quote.usdi_to_repurchase,
            "Liquidated vault"
        );

        let event = LiquidationEvent {
            vault_id,
            liquidator: caller.clone(),
            asset: asset.clone(),
            tokens_liquidated: quote.tokens,
            usdi_repurchased: quote.usdi_to_repurchase,
            bad_fill_price: quote.bad_fill_price,
            base_reduction: reduction,
            liability: liability_of(new_base, factor)?,
            factor,
        };
        self.events.push(ProtocolEvent::Liquidated(event.clone()));
        Ok(event)
    }
}

impl VaultController {
    pub fn new(state: ProtocolState, clock: Arc<dyn Clock>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self {
            state,
            clock,
            oracle,
            outbox: Vec::new(),
        }
    }

    pub fn from_config(
        config: &ProtocolConfig,
        clock: Arc<dyn Clock>,
        oracle: Arc<dyn PriceOracle>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(config.build_state()?, clock, oracle))
    }

    /// Run `op` on a draft of the state, committing only on success
    fn transact<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Transaction<'_>) -> VaultResult<T>,
    ) -> VaultResult<T> {
        let mut tx = Transaction {
            state: self.state.clone(),
            oracle: self.oracle.as_ref(),
            now: self.clock.now(),
            events: Vec::new(),
        };
        match f(&mut tx) {
            Ok(value) => {
                let Transaction { state, events, .. } = tx;
                self.state = state;
                self.outbox.extend(events);
                Ok(value)
            }
            Err(err) => {
                warn!(op, error = %err, "Operation rejected");
                Err(err)
            }
        }
    }

    /// Take the events committed since the last drain
    pub fn drain_events(&mut self) -> Vec<ProtocolEvent> {
        std::mem::take(&mut self.outbox)
    }

    // === Interest ===

    /// Accrue interest to the clock's current time
    pub fn calculate_interest(&mut self) -> VaultResult<InterestEvent> {
        self.transact("calculate_interest", |tx| {
            tx.ensure_not_paused()?;
            tx.pay_interest()
        })
    }

    // === Vaults ===

    pub fn mint_vault(&mut self, minter: &AccountId) -> VaultResult<VaultMintedEvent> {
        self.transact("mint_vault", |tx| {
            ensure_user(minter)?;
            tx.ensure_not_paused()?;
            let vault_id = tx.state.create_vault(minter.clone());
            info!(vault_id = %vault_id, minter = %minter, "Minted vault");

            let event = VaultMintedEvent {
                vault_id,
                minter: minter.clone(),
            };
            tx.events.push(ProtocolEvent::VaultMinted(event.clone()));
            Ok(event)
        })
    }

    /// Move `amount` (native decimals) of a registered asset into a vault
    pub fn deposit_collateral(
        &mut self,
        caller: &AccountId,
        vault_id: VaultId,
        asset: &AssetId,
        amount: U256,
    ) -> VaultResult<CollateralEvent> {
        self.transact("deposit_collateral", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            nonzero_native(amount, "deposit amount")?;
            tx.pay_interest()?;
            let account = tx.state.vault(vault_id)?.account();
            tx.state.collateral(asset)?;
            tx.state.token_mut(asset)?.transfer(caller, &account, amount)?;

            debug!(vault_id = %vault_id, asset = %asset, amount = %amount, "Deposited collateral");

            let event = CollateralEvent {
                vault_id,
                account: caller.clone(),
                asset: asset.clone(),
                amount,
            };
            tx.events.push(ProtocolEvent::CollateralDeposited(event.clone()));
            Ok(event)
        })
    }

    /// Move collateral back to the minter; the vault must stay solvent
    pub fn withdraw_collateral(
        &mut self,
        caller: &AccountId,
        vault_id: VaultId,
        asset: &AssetId,
        amount: U256,
    ) -> VaultResult<CollateralEvent> {
        self.transact("withdraw_collateral", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            nonzero_native(amount, "withdraw amount")?;
            tx.pay_interest()?;
            tx.ensure_minter(vault_id, caller)?;
            tx.state.collateral(asset)?;
            tx.state
                .token_mut(asset)?
                .transfer(&vault_id.account(), caller, amount)?;
            tx.ensure_solvent(vault_id)?;

            debug!(vault_id = %vault_id, asset = %asset, amount = %amount, "Withdrew collateral");

            let event = CollateralEvent {
                vault_id,
                account: caller.clone(),
                asset: asset.clone(),
                amount,
            };
            tx.events.push(ProtocolEvent::CollateralWithdrawn(event.clone()));
            Ok(event)
        })
    }

    // === Reserve ===

    /// Deposit USDC (6 decimals) and mint the USDi equivalent
    pub fn deposit_reserve(&mut self, caller: &AccountId, usdc_amount: U256) -> VaultResult<ReserveEvent> {
        self.transact("deposit_reserve", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            nonzero_native(usdc_amount, "deposit amount")?;
            tx.pay_interest()?;
            tx.state
                .token_mut(&AssetId::usdc())?
                .transfer(caller, &AccountId::reserve(), usdc_amount)?;
            let usdi_amount = tx.state.usdi.deposit_reserve(caller, usdc_amount)?;

            let event = ReserveEvent {
                account: caller.clone(),
                usdc_amount,
                usdi_amount,
                reserve_ratio: tx.state.usdi.reserve_ratio()?,
            };
            info!(account = %caller, usdc = %usdc_amount, "Deposited reserve");
            tx.events.push(ProtocolEvent::ReserveDeposited(event.clone()));
            Ok(event)
        })
    }

    /// Burn USDi and withdraw the USDC equivalent from the reserve
    pub fn withdraw_reserve(&mut self, caller: &AccountId, usdc_amount: U256) -> VaultResult<ReserveEvent> {
        self.transact("withdraw_reserve", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            nonzero_native(usdc_amount, "withdraw amount")?;
            tx.pay_interest()?;
            let usdi_amount = tx.state.usdi.withdraw_reserve(caller, usdc_amount)?;
            tx.state
                .token_mut(&AssetId::usdc())?
                .transfer(&AccountId::reserve(), caller, usdc_amount)?;

            let event = ReserveEvent {
                account: caller.clone(),
                usdc_amount,
                usdi_amount,
                reserve_ratio: tx.state.usdi.reserve_ratio()?,
            };
            info!(account = %caller, usdc = %usdc_amount, "Withdrew reserve");
            tx.events.push(ProtocolEvent::ReserveWithdrawn(event.clone()));
            Ok(event)
        })
    }

    // === Liabilities ===

    pub fn borrow(&mut self, caller: &AccountId, vault_id: VaultId, amount: Wad) -> VaultResult<BorrowEvent> {
        self.transact("borrow", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            tx.pay_interest()?;
            tx.borrow(caller, vault_id, amount)
        })
    }

    /// Borrow everything up to the vault's borrowing power
    pub fn borrow_max(&mut self, caller: &AccountId, vault_id: VaultId) -> VaultResult<BorrowEvent> {
        self.transact("borrow_max", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            tx.pay_interest()?;
            let liability = tx.state.liability(vault_id)?;
            let power = tx.state.borrowing_power(vault_id, tx.oracle)?;
            tx.borrow(caller, vault_id, power.saturating_sub(liability))
        })
    }

    pub fn repay(&mut self, caller: &AccountId, vault_id: VaultId, amount: Wad) -> VaultResult<RepayEvent> {
        self.transact("repay", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            tx.pay_interest()?;
            tx.repay(caller, vault_id, amount)
        })
    }

    pub fn repay_all(&mut self, caller: &AccountId, vault_id: VaultId) -> VaultResult<RepayEvent> {
        self.transact("repay_all", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            tx.pay_interest()?;
            tx.repay_all(caller, vault_id)
        })
    }

    /// Buy up to `max_tokens` (native decimals) of an insolvent vault's
    /// collateral at the incentive-discounted price
    pub fn liquidate(
        &mut self,
        caller: &AccountId,
        vault_id: VaultId,
        asset: &AssetId,
        max_tokens: U256,
    ) -> VaultResult<LiquidationEvent> {
        self.transact("liquidate", |tx| {
            ensure_user(caller)?;
            tx.ensure_not_paused()?;
            tx.pay_interest()?;
            tx.liquidate(caller, vault_id, asset, max_tokens)
        })
    }

    // === Administration ===

    pub fn pause(&mut self, caller: &AccountId) -> VaultResult<()> {
        self.transact("pause", |tx| {
            tx.ensure_owner(caller)?;
            tx.state.paused = true;
            warn!(by = %caller, "Protocol paused");
            tx.events.push(ProtocolEvent::Paused { by: caller.clone() });
            Ok(())
        })
    }

    pub fn unpause(&mut self, caller: &AccountId) -> VaultResult<()> {
        self.transact("unpause", |tx| {
            tx.ensure_owner(caller)?;
            tx.state.paused = false;
            info!(by = %caller, "Protocol unpaused");
            tx.events.push(ProtocolEvent::Unpaused { by: caller.clone() });
            Ok(())
        })
    }

    pub fn register_collateral(&mut self, caller: &AccountId, asset: CollateralAsset) -> VaultResult<()> {
        self.transact("register_collateral", |tx| {
            tx.ensure_owner(caller)?;
            below_one(asset.ltv, "ltv")?;
            tx.state.register_collateral(asset.clone())?;
            info!(asset = %asset.asset, ltv = %asset.ltv, "Registered collateral");
            tx.events.push(ProtocolEvent::CollateralRegistered(asset));
            Ok(())
        })
    }

    pub fn update_collateral(
        &mut self,
        caller: &AccountId,
        asset: &AssetId,
        ltv: Wad,
        liquidation_incentive: Wad,
    ) -> VaultResult<()> {
        self.transact("update_collateral", |tx| {
            tx.ensure_owner(caller)?;
            below_one(ltv, "ltv")?;
            let entry = tx
                .state
                .collateral
                .get_mut(asset)
                .ok_or_else(|| VaultError::AssetNotRegistered(asset.clone()))?;
            entry.ltv = ltv;
            entry.liquidation_incentive = liquidation_incentive;
            let updated = entry.clone();

            info!(asset = %asset, ltv = %ltv, incentive = %liquidation_incentive, "Updated collateral");
            tx.events.push(ProtocolEvent::CollateralUpdated(updated));
            Ok(())
        })
    }

    pub fn change_protocol_fee(&mut self, caller: &AccountId, fee: Wad) -> VaultResult<()> {
        self.transact("change_protocol_fee", |tx| {
            tx.ensure_owner(caller)?;
            below_one(fee, "protocol fee")?;
            tx.state.protocol_fee = fee;
            info!(fee = %fee, "Changed protocol fee");
            tx.events.push(ProtocolEvent::ProtocolFeeChanged { fee });
            Ok(())
        })
    }

    pub fn set_curve(
        &mut self,
        caller: &AccountId,
        key: AssetId,
        curve: impl Curve + 'static,
    ) -> VaultResult<()> {
        self.transact("set_curve", |tx| {
            tx.ensure_owner(caller)?;
            tx.state.curves.set_curve(key.clone(), curve);
            info!(key = %key, "Set curve");
            tx.events.push(ProtocolEvent::CurveSet { key });
            Ok(())
        })
    }

    /// Credit external tokens to an account (simulation faucet)
    pub fn fund(&mut self, account: &AccountId, asset: &AssetId, amount: U256) -> VaultResult<()> {
        self.transact("fund", |tx| {
            ensure_user(account)?;
            tx.state.token_mut(asset)?.mint(account, amount)?;
            debug!(account = %account, asset = %asset, amount = %amount, "Funded account");
            Ok(())
        })
    }

    // === Queries ===
    //
    // Read against the last committed factor; interest is not accrued.

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn interest_factor(&self) -> Wad {
        self.state.factor()
    }

    pub fn last_interest_time(&self) -> u64 {
        self.state.interest.last_accrual_time()
    }

    pub fn total_base_liability(&self) -> Wad {
        self.state.total_base_liability
    }

    pub fn protocol_fee(&self) -> Wad {
        self.state.protocol_fee
    }

    pub fn reserve_ratio(&self) -> VaultResult<Wad> {
        Ok(self.state.usdi.reserve_ratio()?)
    }

    pub fn vault(&self, vault_id: VaultId) -> VaultResult<&Vault> {
        self.state.vault(vault_id)
    }

    pub fn vault_liability(&self, vault_id: VaultId) -> VaultResult<Wad> {
        self.state.liability(vault_id)
    }

    pub fn borrowing_power(&self, vault_id: VaultId) -> VaultResult<Wad> {
        self.state.borrowing_power(vault_id, self.oracle.as_ref())
    }

    pub fn check_solvency(&self, vault_id: VaultId) -> VaultResult<bool> {
        self.state.is_solvent(vault_id, self.oracle.as_ref())
    }

    pub fn vault_status(&self, vault_id: VaultId) -> VaultResult<VaultStatus> {
        self.state.status(vault_id, self.oracle.as_ref())
    }

    /// Liability in excess of borrowing power, zero when solvent
    pub fn amount_to_solvency(&self, vault_id: VaultId) -> VaultResult<Wad> {
        let liability = self.vault_liability(vault_id)?;
        Ok(liability.saturating_sub(self.borrowing_power(vault_id)?))
    }

    /// Preview of what `liquidate` would do right now
    pub fn tokens_to_liquidate(
        &self,
        vault_id: VaultId,
        asset: &AssetId,
        max_tokens: U256,
    ) -> VaultResult<LiquidationQuote> {
        quote_liquidation(&self.state, self.oracle.as_ref(), vault_id, asset, max_tokens)
    }

    pub fn usdi_balance(&self, account: &AccountId) -> Wad {
        self.state.usdi.balance_of(account)
    }

    pub fn usdi_total_supply(&self) -> Wad {
        self.state.usdi.total_supply()
    }

    /// Native balance of an external token
    pub fn token_balance(&self, asset: &AssetId, account: &AccountId) -> VaultResult<U256> {
        Ok(self.state.token(asset)?.balance_of(account))
    }

    /// Collateral held by a vault, native decimals
    pub fn vault_balance(&self, vault_id: VaultId, asset: &AssetId) -> VaultResult<U256> {
        let account = self.state.vault(vault_id)?.account();
        self.token_balance(asset, &account)
    }
}
