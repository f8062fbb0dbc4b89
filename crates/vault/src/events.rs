//! Per-operation result events
//!
//! Every mutating controller operation returns one of these structs. The
//! controller also queues them as [`ProtocolEvent`] for journaling.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use usdi_core::{AccountId, AssetId, VaultId, Wad, U256};

use crate::liability::CollateralAsset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestEvent {
    pub epoch_time: u64,
    pub rate: Wad,
    pub factor_before: Wad,
    pub factor_after: Wad,
    pub interest_delta: Wad,
    pub protocol_amount: Wad,
    pub donation_amount: Wad,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultMintedEvent {
    pub vault_id: VaultId,
    pub minter: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralEvent {
    pub vault_id: VaultId,
    pub account: AccountId,
    pub asset: AssetId,
    /// Native decimals
    #[serde(with = "usdi_core::serde_u256")]
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveEvent {
    pub account: AccountId,
    #[serde(with = "usdi_core::serde_u256")]
    pub usdc_amount: U256,
    pub usdi_amount: Wad,
    pub reserve_ratio: Wad,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowEvent {
    pub vault_id: VaultId,
    pub borrower: AccountId,
    pub amount: Wad,
    pub base_amount: Wad,
    pub liability: Wad,
    pub factor: Wad,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayEvent {
    pub vault_id: VaultId,
    pub payer: AccountId,
    /// USDi burned from the payer
    pub amount: Wad,
    pub base_reduction: Wad,
    pub liability: Wad,
    pub factor: Wad,
    pub full: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationEvent {
    pub vault_id: VaultId,
    pub liquidator: AccountId,
    pub asset: AssetId,
    #[serde(with = "usdi_core::serde_u256")]
    pub tokens_liquidated: U256,
    pub usdi_repurchased: Wad,
    pub bad_fill_price: Wad,
    pub base_reduction: Wad,
    pub liability: Wad,
    pub factor: Wad,
}

/// Journaled form of every state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProtocolEvent {
    InterestPaid(InterestEvent),
    VaultMinted(VaultMintedEvent),
    CollateralDeposited(CollateralEvent),
    CollateralWithdrawn(CollateralEvent),
    ReserveDeposited(ReserveEvent),
    ReserveWithdrawn(ReserveEvent),
    Borrowed(BorrowEvent),
    Repaid(RepayEvent),
    Liquidated(LiquidationEvent),
    Paused { by: AccountId },
    Unpaused { by: AccountId },
    CollateralRegistered(CollateralAsset),
    CollateralUpdated(CollateralAsset),
    ProtocolFeeChanged { fee: Wad },
    CurveSet { key: AssetId },
}

impl ProtocolEvent {
    /// Snake-case event name, matches the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn vault_id(&self) -> Option<VaultId> {
        match self {
            ProtocolEvent::VaultMinted(e) => Some(e.vault_id),
            ProtocolEvent::CollateralDeposited(e) | ProtocolEvent::CollateralWithdrawn(e) => {
                Some(e.vault_id)
            }
            ProtocolEvent::Borrowed(e) => Some(e.vault_id),
            ProtocolEvent::Repaid(e) => Some(e.vault_id),
            ProtocolEvent::Liquidated(e) => Some(e.vault_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tag_matches_kind() {
        let event = ProtocolEvent::VaultMinted(VaultMintedEvent {
            vault_id: VaultId(1),
            minter: AccountId::new("bob").unwrap(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "vault_minted");
        assert_eq!(event.kind(), "vault_minted");
        assert_eq!(json["vault_id"], 1);
        assert_eq!(event.vault_id(), Some(VaultId(1)));
    }

    #[test]
    fn test_amounts_serialize_as_strings() {
        let event = ProtocolEvent::Liquidated(LiquidationEvent {
            vault_id: VaultId(2),
            liquidator: AccountId::new("dave").unwrap(),
            asset: "WETH".parse().unwrap(),
            tokens_liquidated: U256::from(5u64),
            usdi_repurchased: Wad::from_raw_u128(1_000),
            bad_fill_price: Wad::ONE,
            base_reduction: Wad::from_raw_u128(999),
            liability: Wad::ZERO,
            factor: Wad::ONE,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""tokens_liquidated":"5""#));
        assert!(json.contains(r#""usdi_repurchased":"1000""#));

        let back: ProtocolEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_unit_like_variants() {
        let event = ProtocolEvent::Paused {
            by: AccountId::new("owner").unwrap(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"paused","by":"owner"}"#);
        assert_eq!(event.kind(), "paused");
    }
}
