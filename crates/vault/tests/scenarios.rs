//! End-to-end lending scenarios against the vault controller

use std::sync::Arc;

use rust_decimal_macros::dec;
use usdi_core::{AccountId, AssetId, ManualClock, VaultId, Wad, ONE_WEEK, SECONDS_PER_YEAR, U256};
use usdi_oracle::MockOracle;
use usdi_vault::interest::compound;
use usdi_vault::{
    CollateralConfig, InterestEngine, ProtocolConfig, VaultController, VaultError, VaultStatus,
};

const START: u64 = 1_700_000_000;

struct Harness {
    controller: VaultController,
    clock: Arc<ManualClock>,
    oracle: Arc<MockOracle>,
}

fn account(id: &str) -> AccountId {
    AccountId::new(id).unwrap()
}

fn weth() -> AssetId {
    "WETH".parse().unwrap()
}

fn usdc() -> AssetId {
    AssetId::usdc()
}

fn wad(value: rust_decimal::Decimal) -> Wad {
    Wad::from_decimal(value).unwrap()
}

fn units(n: u64) -> Wad {
    Wad::from_units(n).unwrap()
}

/// Mainnet-like deployment: WETH at $3000, 85% LTV, 5% incentive
fn harness() -> anyhow::Result<Harness> {
    let config = ProtocolConfig {
        start_time: START,
        collateral: vec![CollateralConfig {
            asset: weth(),
            decimals: 18,
            ltv: dec!(0.85),
            liquidation_incentive: dec!(0.05),
            price: Some(dec!(3000)),
        }],
        ..ProtocolConfig::default()
    };
    let clock = Arc::new(ManualClock::new(START));
    let oracle = Arc::new(MockOracle::with_prices(config.initial_prices()?));
    let mut controller = VaultController::from_config(&config, clock.clone(), oracle.clone())?;

    controller.fund(&account("bob"), &weth(), units(10).raw())?;
    controller.fund(&account("dave"), &usdc(), U256::from(1_000_000_000_000u64))?;

    Ok(Harness {
        controller,
        clock,
        oracle,
    })
}

/// Bob's vault holding 10 WETH
fn bob_vault(h: &mut Harness) -> anyhow::Result<VaultId> {
    let bob = account("bob");
    let id = h.controller.mint_vault(&bob)?.vault_id;
    h.controller
        .deposit_collateral(&bob, id, &weth(), units(10).raw())?;
    Ok(id)
}

#[test]
fn test_scenario_a_liability_after_one_week() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let id = bob_vault(&mut h)?;

    let borrow_amount = units(5000);
    let event = h.controller.borrow(&bob, id, borrow_amount)?;
    assert_eq!(event.factor, Wad::ONE);
    assert_eq!(h.controller.vault_liability(id)?, borrow_amount);

    h.clock.advance(ONE_WEEK)?;
    let interest = h.controller.calculate_interest()?;

    // No reserve: ratio 0, rate r0 = 200%
    assert_eq!(interest.rate, units(2));
    let expected_factor = compound(Wad::ONE, ONE_WEEK, units(2))?;
    assert_eq!(interest.factor_after, expected_factor);
    assert_eq!(expected_factor, Wad::from_raw_u128(1_038_329_911_019_849_418));

    let liability = h.controller.vault_liability(id)?;
    assert!(liability > borrow_amount);
    assert_eq!(liability, Wad::from_raw_u128(5_191_649_555_099_247_090_000));
    Ok(())
}

#[test]
fn test_scenario_b_oversized_borrow_rejected() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let id = bob_vault(&mut h)?;

    let power = h.controller.borrowing_power(id)?;
    assert_eq!(power, units(25_500));

    let supply = h.controller.usdi_total_supply();
    let result = h.controller.borrow(&bob, id, power.mul_int(1_000_000)?);
    assert!(matches!(result, Err(VaultError::InsolventAccount { .. })));

    assert_eq!(h.controller.vault_liability(id)?, Wad::ZERO);
    assert_eq!(h.controller.total_base_liability(), Wad::ZERO);
    assert_eq!(h.controller.usdi_balance(&bob), Wad::ZERO);
    assert_eq!(h.controller.usdi_total_supply(), supply);
    Ok(())
}

#[test]
fn test_scenario_c_repay_while_paused() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let owner = account("owner");
    let id = bob_vault(&mut h)?;
    h.controller.borrow(&bob, id, units(5000))?;

    h.clock.advance(ONE_WEEK)?;
    h.controller.pause(&owner)?;
    let result = h.controller.repay(&bob, id, units(1000));
    assert_eq!(result.unwrap_err(), VaultError::ProtocolPaused);
    assert_eq!(h.controller.last_interest_time(), START);

    // Reads still work while paused
    assert!(h.controller.check_solvency(id)?);

    h.controller.unpause(&owner)?;
    let base_before = h.controller.vault(id)?.base_liability;
    let event = h.controller.repay(&bob, id, units(1000))?;

    let factor = h.controller.interest_factor();
    assert!(factor > Wad::ONE);
    let reduction = units(1000).div_trunc(factor)?;
    let expected_base = base_before.checked_sub(reduction)?;
    assert_eq!(event.base_reduction, reduction);
    assert_eq!(h.controller.vault(id)?.base_liability, expected_base);
    assert_eq!(h.controller.vault_liability(id)?, expected_base.mul_trunc(factor)?);
    Ok(())
}

#[test]
fn test_scenario_d_ten_years_then_liquidate() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let dave = account("dave");

    // Dave backs the reserve and holds the USDi used to liquidate
    h.controller
        .deposit_reserve(&dave, U256::from(100_000_000_000u64))?;
    assert_eq!(h.controller.usdi_balance(&dave), units(100_000));

    let id = bob_vault(&mut h)?;
    h.controller.borrow_max(&bob, id)?;
    assert!(h.controller.check_solvency(id)?);
    assert_eq!(h.controller.vault_status(id)?, VaultStatus::Borrowed);

    h.clock.advance(10 * SECONDS_PER_YEAR)?;
    h.controller.calculate_interest()?;
    assert!(!h.controller.check_solvency(id)?);
    assert_eq!(h.controller.vault_status(id)?, VaultStatus::Liquidatable);

    let max_tokens = units(1).raw();
    let preview = h.controller.tokens_to_liquidate(id, &weth(), max_tokens)?;

    let liability_before = h.controller.vault_liability(id)?;
    let vault_weth_before = h.controller.vault_balance(id, &weth())?;
    let dave_usdi_before = h.controller.usdi_balance(&dave);

    let event = h.controller.liquidate(&dave, id, &weth(), max_tokens)?;
    assert_eq!(event.tokens_liquidated, preview.tokens);
    assert_eq!(event.usdi_repurchased, preview.usdi_to_repurchase);
    assert!(event.tokens_liquidated <= max_tokens);

    let liability_after = h.controller.vault_liability(id)?;
    let reduction = liability_before.checked_sub(liability_after)?;
    let tolerance = Wad::from_raw_u128(10);
    assert!(reduction <= event.usdi_repurchased.checked_add(tolerance)?);
    assert!(event.usdi_repurchased <= reduction.checked_add(tolerance)?);

    assert_eq!(
        vault_weth_before - h.controller.vault_balance(id, &weth())?,
        event.tokens_liquidated
    );
    assert_eq!(
        h.controller.token_balance(&weth(), &dave)?,
        event.tokens_liquidated
    );
    let paid = dave_usdi_before.checked_sub(h.controller.usdi_balance(&dave))?;
    assert!(paid.checked_sub(event.usdi_repurchased)? <= Wad::from_raw_u128(1));
    assert!(h.controller.state().base_liability_consistent());
    Ok(())
}

#[test]
fn test_liquidating_solvent_vault_fails() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let id = bob_vault(&mut h)?;
    h.controller.borrow(&bob, id, units(1000))?;

    let result = h.controller.liquidate(&account("dave"), id, &weth(), units(1).raw());
    assert_eq!(result.unwrap_err(), VaultError::VaultSolvent(id));
    Ok(())
}

#[test]
fn test_price_crash_liquidation_to_solvency() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let dave = account("dave");
    h.controller
        .deposit_reserve(&dave, U256::from(100_000_000_000u64))?;
    let id = bob_vault(&mut h)?;
    h.controller.borrow_max(&bob, id)?;

    h.oracle.set_price(weth(), units(2900));
    let event = h.controller.liquidate(&dave, id, &weth(), units(10).raw())?;

    // Liquidation stops around solvency instead of draining the vault
    assert!(event.tokens_liquidated < units(10).raw());
    assert!(h.controller.amount_to_solvency(id)? <= units(1));
    Ok(())
}

#[test]
fn test_round_trip_borrow_liability() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let id = bob_vault(&mut h)?;

    h.controller.borrow(&bob, id, units(1234))?;
    assert_eq!(h.controller.vault_liability(id)?, units(1234));

    h.clock.advance(ONE_WEEK)?;
    h.controller.calculate_interest()?;
    let before = h.controller.vault_liability(id)?;
    h.controller.borrow(&bob, id, units(100))?;
    let added = h.controller.vault_liability(id)?.checked_sub(before)?;
    let diff = if added > units(100) {
        added.checked_sub(units(100))?
    } else {
        units(100).checked_sub(added)?
    };
    assert!(diff <= Wad::from_raw_u128(2));
    Ok(())
}

#[test]
fn test_solvency_check_is_idempotent() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let id = bob_vault(&mut h)?;
    h.controller.borrow_max(&bob, id)?;

    let first = h.controller.check_solvency(id)?;
    let second = h.controller.check_solvency(id)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_repay_boundary() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let id = bob_vault(&mut h)?;
    h.controller.borrow(&bob, id, units(3000))?;

    // Factor is still 1e18: the exact liability zeroes the base
    let over = h.controller.repay(&bob, id, units(3000).checked_add(Wad::from_raw_u128(1))?);
    assert!(matches!(over, Err(VaultError::OverRepay { .. })));

    let event = h.controller.repay(&bob, id, units(3000))?;
    assert!(event.full);
    assert_eq!(h.controller.vault(id)?.base_liability, Wad::ZERO);
    assert_eq!(h.controller.total_base_liability(), Wad::ZERO);
    Ok(())
}

#[test]
fn test_repay_all_after_interest() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let dave = account("dave");
    h.controller
        .deposit_reserve(&dave, U256::from(10_000_000_000u64))?;
    let id = bob_vault(&mut h)?;
    h.controller.borrow(&bob, id, units(3000))?;

    h.clock.advance(ONE_WEEK)?;
    h.controller.calculate_interest()?;
    let owed = h.controller.vault_liability(id)?;

    let over = h.controller.repay(&bob, id, owed.checked_add(units(1))?);
    assert!(matches!(over, Err(VaultError::OverRepay { .. })));

    // Bob needs the accrued interest on top of what he borrowed
    assert!(h.controller.usdi_balance(&bob) < owed);
    let usdc_top_up = U256::from(100_000_000u64);
    h.controller.fund(&bob, &usdc(), usdc_top_up)?;
    h.controller.deposit_reserve(&bob, usdc_top_up)?;

    let event = h.controller.repay_all(&bob, id)?;
    assert!(event.full);
    assert_eq!(event.amount, owed);
    assert_eq!(h.controller.vault_liability(id)?, Wad::ZERO);
    assert_eq!(h.controller.vault_status(id)?, VaultStatus::NoDebt);
    assert_eq!(h.controller.total_base_liability(), Wad::ZERO);
    Ok(())
}

#[test]
fn test_holder_balance_after_accrual() -> anyhow::Result<()> {
    let mut h = harness()?;
    let bob = account("bob");
    let dave = account("dave");
    h.controller
        .deposit_reserve(&dave, U256::from(10_000_000_000u64))?;
    let id = bob_vault(&mut h)?;
    h.controller.borrow(&bob, id, units(20_000))?;

    let usdi = &h.controller.state().usdi;
    let dave_gons = usdi.scaled_balance_of(&dave);
    let total_gons = usdi.total_gons();
    let supply_before = usdi.total_supply();
    let dave_before = usdi.balance_of(&dave);

    h.clock.advance(ONE_WEEK)?;
    let interest = h.controller.calculate_interest()?;
    assert!(interest.interest_delta > Wad::ZERO);
    assert_eq!(
        interest.protocol_amount,
        interest.interest_delta.mul_trunc(h.controller.protocol_fee())?
    );

    // gonsPerFragment = totalGons / (supply + donation)
    let donated_supply = supply_before.checked_add(interest.donation_amount)?;
    let gons_per_fragment = total_gons / donated_supply.raw();
    let expected = Wad::from_raw(dave_gons / gons_per_fragment);

    let dave_after = h.controller.usdi_balance(&dave);
    assert_eq!(dave_after, expected);
    assert!(dave_after > dave_before);
    assert!(h.controller.usdi_balance(&account("owner")) > Wad::ONE);
    Ok(())
}

#[test]
fn test_compounding_split_vs_single() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let rate = wad(dec!(0.1));

    for _ in 0..50 {
        let t1 = rng.gen_range(86_400..SECONDS_PER_YEAR);
        let t2 = rng.gen_range(86_400..SECONDS_PER_YEAR);

        let mut split = InterestEngine::new(0);
        split.accrue(t1, rate).unwrap();
        split.accrue(t1 + t2, rate).unwrap();

        let mut single = InterestEngine::new(0);
        single.accrue(t1 + t2, rate).unwrap();

        assert!(split.factor() >= single.factor());

        // Gap is the second-order term p1 * p2 / 1e18, give or take one unit
        let p1 = compound(Wad::ONE, t1, rate).unwrap().checked_sub(Wad::ONE).unwrap();
        let p2 = compound(Wad::ONE, t2, rate).unwrap().checked_sub(Wad::ONE).unwrap();
        let cross = p1.mul_trunc(p2).unwrap();
        let gap = split.factor().checked_sub(single.factor()).unwrap();
        assert!(gap <= cross);
        assert!(cross.checked_sub(gap).unwrap() <= Wad::from_raw_u128(1));
    }
}

#[test]
fn test_compounding_with_empty_interval() {
    let rate = wad(dec!(0.0525));
    for (t1, t2) in [(0, ONE_WEEK), (ONE_WEEK, 0), (0, 0)] {
        let mut split = InterestEngine::new(0);
        split.accrue(t1, rate).unwrap();
        split.accrue(t1 + t2, rate).unwrap();

        let mut single = InterestEngine::new(0);
        single.accrue(t1 + t2, rate).unwrap();

        assert_eq!(split.factor(), single.factor());
    }
}

#[test]
fn test_clock_regression_rejected() -> anyhow::Result<()> {
    let mut h = harness()?;
    h.clock.advance(100)?;
    h.controller.calculate_interest()?;

    let mut stale = InterestEngine::new(START + 100);
    let result = stale.accrue(START, units(1));
    assert!(matches!(result, Err(VaultError::InvalidTime { .. })));
    assert!(h.clock.set(START).is_err());
    Ok(())
}
