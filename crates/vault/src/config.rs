//! Protocol configuration
//!
//! Human-facing fractions and prices are decimals (`"0.85"`) and are
//! converted into 18-decimal [`Wad`] values when the state is built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use usdi_core::{AccountId, AssetId, MathError, Wad};
use usdi_curve::{CurveError, CurveMaster, ThreeLines};

use crate::liability::CollateralAsset;
use crate::state::ProtocolState;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Math(#[from] MathError),
}

/// Configuration for a protocol deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Protocol owner: holds the genesis USDi and receives protocol fees
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Share of each interest distribution minted to the owner
    #[serde(default = "default_protocol_fee")]
    pub protocol_fee: Decimal,

    /// Unix time of the first accrual epoch
    #[serde(default)]
    pub start_time: u64,

    #[serde(default)]
    pub curve: CurveConfig,

    #[serde(default)]
    pub collateral: Vec<CollateralConfig>,
}

/// Three-segment rate curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveConfig {
    #[serde(default = "default_r0")]
    pub r0: Decimal,
    #[serde(default = "default_r1")]
    pub r1: Decimal,
    #[serde(default = "default_r2")]
    pub r2: Decimal,
    #[serde(default = "default_s1")]
    pub s1: Decimal,
    #[serde(default = "default_s2")]
    pub s2: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralConfig {
    pub asset: AssetId,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    pub ltv: Decimal,
    pub liquidation_incentive: Decimal,
    /// Initial USD price for the simulation oracle
    #[serde(default)]
    pub price: Option<Decimal>,
}

fn default_owner() -> String {
    "owner".to_string()
}

fn default_protocol_fee() -> Decimal {
    Decimal::new(1, 4) // 0.01%
}

fn default_r0() -> Decimal {
    Decimal::new(2, 0)
}

fn default_r1() -> Decimal {
    Decimal::new(1, 1)
}

fn default_r2() -> Decimal {
    Decimal::new(5, 3)
}

fn default_s1() -> Decimal {
    Decimal::new(25, 2)
}

fn default_s2() -> Decimal {
    Decimal::new(50, 2)
}

fn default_decimals() -> u8 {
    18
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            r0: default_r0(),
            r1: default_r1(),
            r2: default_r2(),
            s1: default_s1(),
            s2: default_s2(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            protocol_fee: default_protocol_fee(),
            start_time: 0,
            curve: CurveConfig::default(),
            collateral: Vec::new(),
        }
    }
}

/// A fraction strictly below one
fn fraction(field: &str, value: Decimal) -> Result<Wad, ConfigError> {
    let wad = Wad::from_decimal(value)?;
    if wad >= Wad::ONE {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("{value} must be below 1"),
        });
    }
    Ok(wad)
}

impl CurveConfig {
    pub fn build(&self) -> Result<ThreeLines, ConfigError> {
        Ok(ThreeLines::new(
            Wad::from_decimal(self.r0)?,
            Wad::from_decimal(self.r1)?,
            Wad::from_decimal(self.r2)?,
            Wad::from_decimal(self.s1)?,
            Wad::from_decimal(self.s2)?,
        )?)
    }
}

impl CollateralConfig {
    pub fn build(&self) -> Result<CollateralAsset, ConfigError> {
        Ok(CollateralAsset {
            asset: self.asset.clone(),
            decimals: self.decimals,
            ltv: fraction(&format!("{}.ltv", self.asset), self.ltv)?,
            liquidation_incentive: Wad::from_decimal(self.liquidation_incentive)?,
        })
    }
}

impl ProtocolConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn owner_account(&self) -> Result<AccountId, ConfigError> {
        AccountId::new(self.owner.as_str()).map_err(|e| ConfigError::Invalid {
            field: "owner".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn protocol_fee_wad(&self) -> Result<Wad, ConfigError> {
        fraction("protocol_fee", self.protocol_fee)
    }

    /// Configured initial prices, for seeding an oracle
    pub fn initial_prices(&self) -> Result<Vec<(AssetId, Wad)>, ConfigError> {
        let mut prices = Vec::new();
        for entry in &self.collateral {
            if let Some(price) = entry.price {
                prices.push((entry.asset.clone(), Wad::from_decimal(price)?));
            }
        }
        Ok(prices)
    }

    /// Genesis state with the configured curve and collateral registered
    pub fn build_state(&self) -> Result<ProtocolState, ConfigError> {
        let curves = CurveMaster::with_default(self.curve.build()?);
        let mut state = ProtocolState::new(
            self.owner_account()?,
            self.start_time,
            self.protocol_fee_wad()?,
            curves,
        );
        for entry in &self.collateral {
            state
                .register_collateral(entry.build()?)
                .map_err(|e| ConfigError::Invalid {
                    field: format!("collateral.{}", entry.asset),
                    reason: e.to_string(),
                })?;
        }
        Ok(state)
    }
}
