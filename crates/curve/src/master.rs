//! Curve registry keyed by asset

use std::collections::HashMap;
use std::sync::Arc;

use usdi_core::{AssetId, Wad};

use crate::{Curve, CurveError};

/// Holds the curves the controller may consult.
///
/// Interest accrual reads the curve registered under
/// [`AssetId::default_curve_key`].
#[derive(Debug, Clone, Default)]
pub struct CurveMaster {
    curves: HashMap<AssetId, Arc<dyn Curve>>,
}

impl CurveMaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a single default curve
    pub fn with_default(curve: impl Curve + 'static) -> Self {
        let mut master = Self::new();
        master.set_curve(AssetId::default_curve_key(), curve);
        master
    }

    /// Register or replace the curve for `key`
    pub fn set_curve(&mut self, key: AssetId, curve: impl Curve + 'static) {
        self.curves.insert(key, Arc::new(curve));
    }

    pub fn has_curve(&self, key: &AssetId) -> bool {
        self.curves.contains_key(key)
    }

    pub fn value_at(&self, key: &AssetId, x: Wad) -> Result<Wad, CurveError> {
        self.curves
            .get(key)
            .ok_or_else(|| CurveError::NotEnabled(key.clone()))?
            .value_at(x)
    }

    /// Value on the default curve
    pub fn default_value_at(&self, x: Wad) -> Result<Wad, CurveError> {
        self.value_at(&AssetId::default_curve_key(), x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThreeLines;
    use rust_decimal_macros::dec;

    #[derive(Debug)]
    struct Flat(Wad);

    impl Curve for Flat {
        fn value_at(&self, _x: Wad) -> Result<Wad, CurveError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_default_curve_lookup() {
        let rate = Wad::from_decimal(dec!(0.05)).unwrap();
        let master = CurveMaster::with_default(Flat(rate));
        assert_eq!(master.default_value_at(Wad::ZERO).unwrap(), rate);
    }

    #[test]
    fn test_missing_curve() {
        let master = CurveMaster::new();
        let key: AssetId = "WETH".parse().unwrap();
        assert!(matches!(
            master.value_at(&key, Wad::ZERO),
            Err(CurveError::NotEnabled(_))
        ));
    }

    #[test]
    fn test_replace_curve() {
        let mut master = CurveMaster::with_default(Flat(Wad::ONE));
        let curve = ThreeLines::new(
            Wad::from_decimal(dec!(2)).unwrap(),
            Wad::from_decimal(dec!(0.1)).unwrap(),
            Wad::from_decimal(dec!(0.005)).unwrap(),
            Wad::from_decimal(dec!(0.25)).unwrap(),
            Wad::from_decimal(dec!(0.5)).unwrap(),
        )
        .unwrap();
        master.set_curve(AssetId::default_curve_key(), curve);
        assert_eq!(
            master.default_value_at(Wad::ONE).unwrap(),
            Wad::from_decimal(dec!(0.005)).unwrap()
        );
    }
}
