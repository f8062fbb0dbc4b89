//! Serde helpers for native token amounts
//!
//! Encodes a [`U256`] as a base-10 string, e.g. `#[serde(with = "usdi_core::serde_u256")]`.

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let s = String::deserialize(deserializer)?;
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(de::Error::custom(format!("invalid integer amount: {s}")));
    }
    U256::from_str_radix(&s, 10).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holding {
        #[serde(with = "super")]
        amount: U256,
    }

    #[test]
    fn test_decimal_string_encoding() {
        let holding = Holding {
            amount: U256::from(1_500_000u64),
        };
        let json = serde_json::to_string(&holding).unwrap();
        assert_eq!(json, r#"{"amount":"1500000"}"#);
        let back: Holding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, holding);
    }

    #[test]
    fn test_rejects_hex_and_sign() {
        assert!(serde_json::from_str::<Holding>(r#"{"amount":"0x10"}"#).is_err());
        assert!(serde_json::from_str::<Holding>(r#"{"amount":"-1"}"#).is_err());
    }
}
