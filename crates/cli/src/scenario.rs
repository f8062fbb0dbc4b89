//! Scenario files
//!
//! ```json
//! {
//!   "start_time": 1700000000,
//!   "steps": [
//!     { "action": "fund", "account": "bob", "asset": "WETH", "amount": "10" },
//!     { "action": "mint_vault", "owner": "bob" },
//!     { "action": "advance", "seconds": 604800 },
//!     { "action": "repay", "account": "bob", "vault": 1, "amount": "100", "expect_error": "paused" }
//!   ]
//! }
//! ```
//!
//! Amounts are human-readable decimals: USDi in whole units, tokens in whole
//! tokens of the asset's own decimals.

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use usdi_core::{AccountId, AssetId, VaultId, Wad, U256};
use usdi_token::TokenLedger;
use usdi_vault::VaultStatus;

use crate::context::AppContext;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Overrides the configured start time
    #[serde(default)]
    pub start_time: Option<u64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    /// The step must fail with an error whose message contains this text
    #[serde(default)]
    pub expect_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Advance {
        seconds: u64,
    },
    Fund {
        account: AccountId,
        asset: AssetId,
        amount: Decimal,
    },
    MintVault {
        owner: AccountId,
    },
    DepositCollateral {
        account: AccountId,
        vault: VaultId,
        asset: AssetId,
        amount: Decimal,
    },
    WithdrawCollateral {
        account: AccountId,
        vault: VaultId,
        asset: AssetId,
        amount: Decimal,
    },
    DepositReserve {
        account: AccountId,
        amount: Decimal,
    },
    WithdrawReserve {
        account: AccountId,
        amount: Decimal,
    },
    Borrow {
        account: AccountId,
        vault: VaultId,
        amount: Decimal,
    },
    BorrowMax {
        account: AccountId,
        vault: VaultId,
    },
    Repay {
        account: AccountId,
        vault: VaultId,
        amount: Decimal,
    },
    RepayAll {
        account: AccountId,
        vault: VaultId,
    },
    Liquidate {
        account: AccountId,
        vault: VaultId,
        asset: AssetId,
        max_tokens: Decimal,
    },
    CalculateInterest,
    SetPrice {
        asset: AssetId,
        price: Decimal,
    },
    Pause {
        account: AccountId,
    },
    Unpause {
        account: AccountId,
    },
    Check {
        vault: VaultId,
        #[serde(default)]
        status: Option<VaultStatus>,
        #[serde(default)]
        solvent: Option<bool>,
    },
}

/// Outcome of one executed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub index: usize,
    pub summary: String,
    /// Journal records written by the step
    pub records: usize,
}

impl Scenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing scenario {}", path.display()))
    }
}

/// Whole-token decimal to the asset's native units
fn native_amount(ctx: &AppContext, asset: &AssetId, amount: Decimal) -> anyhow::Result<U256> {
    let decimals = ctx.controller.state().token(asset)?.decimals();
    Ok(Wad::from_decimal(amount)?.to_native(decimals)?)
}

/// Wad as a plain decimal, raw integer when it does not fit
pub fn human(value: Wad) -> String {
    value
        .to_decimal()
        .map(|d| d.normalize().to_string())
        .unwrap_or_else(|| value.to_string())
}

fn usdc_amount(amount: Decimal) -> anyhow::Result<U256> {
    Ok(Wad::from_decimal(amount)?.to_native(usdi_token::USDC_DECIMALS)?)
}

fn execute(ctx: &mut AppContext, action: &Action) -> anyhow::Result<String> {
    let summary = match action {
        Action::Advance { seconds } => {
            let now = ctx.clock.advance(*seconds)?;
            format!("advanced {seconds}s to {now}")
        }
        Action::Fund {
            account,
            asset,
            amount,
        } => {
            let native = native_amount(ctx, asset, *amount)?;
            ctx.controller.fund(account, asset, native)?;
            format!("funded {account} with {amount} {asset}")
        }
        Action::MintVault { owner } => {
            let event = ctx.controller.mint_vault(owner)?;
            format!("minted vault {} for {owner}", event.vault_id)
        }
        Action::DepositCollateral {
            account,
            vault,
            asset,
            amount,
        } => {
            let native = native_amount(ctx, asset, *amount)?;
            ctx.controller.deposit_collateral(account, *vault, asset, native)?;
            format!("{account} deposited {amount} {asset} into vault {vault}")
        }
        Action::WithdrawCollateral {
            account,
            vault,
            asset,
            amount,
        } => {
            let native = native_amount(ctx, asset, *amount)?;
            ctx.controller.withdraw_collateral(account, *vault, asset, native)?;
            format!("{account} withdrew {amount} {asset} from vault {vault}")
        }
        Action::DepositReserve { account, amount } => {
            let event = ctx.controller.deposit_reserve(account, usdc_amount(*amount)?)?;
            format!(
                "{account} deposited {amount} USDC, reserve ratio {}",
                human(event.reserve_ratio)
            )
        }
        Action::WithdrawReserve { account, amount } => {
            let event = ctx.controller.withdraw_reserve(account, usdc_amount(*amount)?)?;
            format!(
                "{account} withdrew {amount} USDC, reserve ratio {}",
                human(event.reserve_ratio)
            )
        }
        Action::Borrow {
            account,
            vault,
            amount,
        } => {
            let event = ctx
                .controller
                .borrow(account, *vault, Wad::from_decimal(*amount)?)?;
            format!("vault {vault} borrowed {amount} USDi, liability {}", human(event.liability))
        }
        Action::BorrowMax { account, vault } => {
            let event = ctx.controller.borrow_max(account, *vault)?;
            format!("vault {vault} borrowed {} (max), liability {}", human(event.amount), human(event.liability))
        }
        Action::Repay {
            account,
            vault,
            amount,
        } => {
            let event = ctx
                .controller
                .repay(account, *vault, Wad::from_decimal(*amount)?)?;
            format!("{account} repaid {amount} USDi, liability {}", human(event.liability))
        }
        Action::RepayAll { account, vault } => {
            let event = ctx.controller.repay_all(account, *vault)?;
            format!("{account} repaid {} USDi, vault {vault} closed", human(event.amount))
        }
        Action::Liquidate {
            account,
            vault,
            asset,
            max_tokens,
        } => {
            let native = native_amount(ctx, asset, *max_tokens)?;
            let event = ctx.controller.liquidate(account, *vault, asset, native)?;
            format!(
                "{account} liquidated {} {asset} from vault {vault} for {} USDi",
                event.tokens_liquidated, human(event.usdi_repurchased)
            )
        }
        Action::CalculateInterest => {
            let event = ctx.controller.calculate_interest()?;
            format!(
                "interest factor {} -> {}, delta {}",
                human(event.factor_before), human(event.factor_after), human(event.interest_delta)
            )
        }
        Action::SetPrice { asset, price } => {
            ctx.oracle.set_price(asset.clone(), Wad::from_decimal(*price)?);
            format!("price of {asset} set to {price}")
        }
        Action::Pause { account } => {
            ctx.controller.pause(account)?;
            "protocol paused".to_string()
        }
        Action::Unpause { account } => {
            ctx.controller.unpause(account)?;
            "protocol unpaused".to_string()
        }
        Action::Check {
            vault,
            status,
            solvent,
        } => {
            let actual_status = ctx.controller.vault_status(*vault)?;
            let actual_solvent = ctx.controller.check_solvency(*vault)?;
            if let Some(expected) = status {
                if *expected != actual_status {
                    bail!("vault {vault}: expected status {expected}, found {actual_status}");
                }
            }
            if let Some(expected) = solvent {
                if *expected != actual_solvent {
                    bail!("vault {vault}: expected solvent = {expected}, found {actual_solvent}");
                }
            }
            format!(
                "vault {vault}: {actual_status}, liability {}",
                human(ctx.controller.vault_liability(*vault)?)
            )
        }
    };
    Ok(summary)
}

/// Run every step in order, journaling committed events after each one
pub fn run(ctx: &mut AppContext, scenario: &Scenario) -> anyhow::Result<Vec<StepOutcome>> {
    let mut outcomes = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let result = execute(ctx, &step.action);
        let summary = match (&step.expect_error, result) {
            (None, Ok(summary)) => summary,
            (None, Err(err)) => return Err(err.context(format!("step {}", index + 1))),
            (Some(expected), Ok(_)) => {
                bail!("step {}: expected error containing {expected:?}", index + 1)
            }
            (Some(expected), Err(err)) => {
                let message = err.to_string();
                if !message.to_lowercase().contains(&expected.to_lowercase()) {
                    bail!("step {}: expected error containing {expected:?}, got {message}", index + 1);
                }
                format!("rejected as expected: {message}")
            }
        };

        let records = ctx.commit()?.len();
        info!(step = index + 1, records, "{}", summary);
        outcomes.push(StepOutcome {
            index: index + 1,
            summary,
            records,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let json = r#"{
            "steps": [
                { "action": "advance", "seconds": 60 },
                { "action": "calculate_interest" },
                { "action": "repay", "account": "bob", "vault": 1, "amount": "10.5", "expect_error": "paused" },
                { "action": "check", "vault": 1, "status": "LIQUIDATABLE" }
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.start_time, None);
        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(scenario.steps[1].action, Action::CalculateInterest));
        assert_eq!(scenario.steps[2].expect_error.as_deref(), Some("paused"));
        assert!(matches!(
            scenario.steps[3].action,
            Action::Check {
                status: Some(VaultStatus::Liquidatable),
                solvent: None,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let json = r#"{ "steps": [ { "action": "teleport" } ] }"#;
        assert!(serde_json::from_str::<Scenario>(json).is_err());
    }
}
