//! Vault controller errors

use thiserror::Error;
use usdi_core::{AccountId, AssetId, MathError, VaultId, Wad};
use usdi_curve::CurveError;
use usdi_oracle::OracleError;
use usdi_token::TokenError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Invalid time: {current} is before last accrual at {last}")]
    InvalidTime { current: u64, last: u64 },

    #[error("Vault {vault_id} insolvent: liability {liability}, borrowing power {power}")]
    InsolventAccount {
        vault_id: VaultId,
        liability: Wad,
        power: Wad,
    },

    #[error("Repay of {amount} exceeds liability of vault {vault_id}")]
    OverRepay { vault_id: VaultId, amount: Wad },

    #[error("Vault {0} is solvent")]
    VaultSolvent(VaultId),

    #[error("Protocol is paused")]
    ProtocolPaused,

    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    #[error("Vault not found: {0}")]
    VaultNotFound(VaultId),

    #[error("Collateral asset not registered: {0}")]
    AssetNotRegistered(AssetId),

    #[error("Collateral asset already registered: {0}")]
    AssetAlreadyRegistered(AssetId),

    #[error("{caller} is not the minter of vault {vault_id}")]
    NotMinter { vault_id: VaultId, caller: AccountId },

    #[error("{0} is not authorized")]
    Unauthorized(AccountId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Token(TokenError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Curve(CurveError),
}

pub type VaultResult<T> = Result<T, VaultError>;

impl From<MathError> for VaultError {
    fn from(err: MathError) -> Self {
        VaultError::ArithmeticOverflow(err.to_string())
    }
}

impl From<TokenError> for VaultError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Math(e) => e.into(),
            other => VaultError::Token(other),
        }
    }
}

impl From<CurveError> for VaultError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::Math(e) => e.into(),
            other => VaultError::Curve(other),
        }
    }
}
