//! Token ledger errors

use thiserror::Error;
use usdi_core::{AccountId, MathError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient {asset} balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        asset: String,
        account: AccountId,
        available: String,
        required: String,
    },

    #[error("Insufficient reserve: available {available}, required {required}")]
    InsufficientReserve { available: String, required: String },

    #[error("Total supply cap exceeded")]
    SupplyCapExceeded,

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type TokenResult<T> = Result<T, TokenError>;
