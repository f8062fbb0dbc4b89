//! Identifiers - vault ids, account ids and asset codes
//!
//! Asset codes are validated like ticker symbols; account ids are opaque
//! non-empty strings (the transport decides what they mean). Ids containing
//! `#` belong to protocol-held accounts and can only be built in this module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Empty identifier")]
    Empty,

    #[error("Account id {0} is in the reserved '#' namespace")]
    Reserved(String),

    #[error("Asset code too long (max 10 chars): {0}")]
    TooLong(String),

    #[error("Invalid asset code format: {0}")]
    InvalidFormat(String),
}

/// Sequential vault identifier, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultId(pub u64);

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl VaultId {
    /// Account that holds this vault's collateral
    pub fn account(&self) -> AccountId {
        AccountId(format!("vault{self}"))
    }
}

impl From<u64> for VaultId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Holder / caller identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

const SYSTEM_MARKER: char = '#';

impl AccountId {
    /// A user account; the `#` namespace is rejected
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        if trimmed.contains(SYSTEM_MARKER) {
            return Err(IdError::Reserved(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Vault or reserve account rather than a user
    pub fn is_system(&self) -> bool {
        self.0.contains(SYSTEM_MARKER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Account holding the USDC reserve
    pub fn reserve() -> Self {
        Self("usdi#reserve".to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// Collateral / reserve asset code (e.g. `WETH`, `USDC`)
///
/// # Examples
/// ```
/// use usdi_core::AssetId;
///
/// let weth: AssetId = "weth".parse().unwrap();
/// assert_eq!(weth.as_str(), "WETH");
/// assert!("W-ETH".parse::<AssetId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reserve asset
    pub fn usdc() -> Self {
        Self("USDC".to_string())
    }

    /// Key under which the default pricing curve is registered
    pub fn default_curve_key() -> Self {
        Self("DEFAULT".to_string())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(IdError::Empty);
        }

        if s.len() > 10 {
            return Err(IdError::TooLong(s));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IdError::InvalidFormat(s));
        }

        Ok(Self(s))
    }
}

impl TryFrom<String> for AssetId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetId> for String {
    fn from(asset: AssetId) -> Self {
        asset.0
    }
}
