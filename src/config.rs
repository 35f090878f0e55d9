//! Strategy configuration.
//!
//! Everything the tick function treats as a constant lives here: the product
//! universe with its symmetric position limits, and each basket with its
//! ordered legs and pricing parameters. A basket can be switched off with
//! `enabled = false`, which removes it from normalization, pricing and order
//! generation without touching decision code.
//!
//! Loaded from a file (any format the `config` crate understands) with
//! `BASKETMM__*` environment overrides, or built in code for tests.

use std::collections::HashSet;
use std::path::Path;

use ahash::AHashMap;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::engine::types::Product;
use crate::error::ConfigError;

pub const DEFAULT_POSITION_LIMIT: i64 = 40;
pub const DEFAULT_HALF_SPREAD: f64 = 0.5;
pub const DEFAULT_SKEW_INTENSITY: f64 = 3.5;
pub const DEFAULT_MAKER_QUANTITY: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub symbol: Product,
    pub position_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketConfig {
    pub symbol: Product,
    pub legs: Vec<Product>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_half_spread")]
    pub half_spread: f64,
    #[serde(default = "default_skew_intensity")]
    pub skew_intensity: f64,
    #[serde(default = "default_maker_quantity")]
    pub maker_quantity: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_half_spread() -> f64 {
    DEFAULT_HALF_SPREAD
}

fn default_skew_intensity() -> f64 {
    DEFAULT_SKEW_INTENSITY
}

fn default_maker_quantity() -> u64 {
    DEFAULT_MAKER_QUANTITY
}

impl BasketConfig {
    pub fn new(symbol: &str, legs: &[&str]) -> Self {
        Self {
            symbol: symbol.to_string(),
            legs: legs.iter().map(|l| l.to_string()).collect(),
            enabled: true,
            half_spread: DEFAULT_HALF_SPREAD,
            skew_intensity: DEFAULT_SKEW_INTENSITY,
            maker_quantity: DEFAULT_MAKER_QUANTITY,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn validate(&self, universe: &HashSet<&str>) -> Result<(), ConfigError> {
        if !universe.contains(self.symbol.as_str()) {
            return Err(ConfigError::UnknownProduct {
                basket: self.symbol.clone(),
                product: self.symbol.clone(),
            });
        }
        if self.legs.is_empty() {
            return Err(ConfigError::EmptyBasket(self.symbol.clone()));
        }
        let mut seen = HashSet::new();
        for leg in &self.legs {
            if !seen.insert(leg.as_str()) {
                return Err(ConfigError::DuplicateLeg {
                    basket: self.symbol.clone(),
                    leg: leg.clone(),
                });
            }
            if *leg == self.symbol {
                return Err(ConfigError::SelfReferencingBasket(self.symbol.clone()));
            }
            if !universe.contains(leg.as_str()) {
                return Err(ConfigError::UnknownProduct {
                    basket: self.symbol.clone(),
                    product: leg.clone(),
                });
            }
        }

        self.check_non_negative("half_spread", self.half_spread)?;
        self.check_non_negative("skew_intensity", self.skew_intensity)?;
        if self.maker_quantity == 0 {
            return Err(ConfigError::InvalidParameter {
                basket: self.symbol.clone(),
                field: "maker_quantity",
                expected: "positive",
                value: self.maker_quantity.to_string(),
            });
        }
        Ok(())
    }

    fn check_non_negative(&self, field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            return Ok(());
        }
        Err(ConfigError::InvalidParameter {
            basket: self.symbol.clone(),
            field,
            expected: "finite and non-negative",
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub baskets: Vec<BasketConfig>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        let products = ["ETF1", "ETF2", "bond1", "bond2", "bond3", "bond4"]
            .iter()
            .map(|s| ProductConfig { symbol: s.to_string(), position_limit: DEFAULT_POSITION_LIMIT })
            .collect();

        Self {
            products,
            baskets: vec![
                BasketConfig::new("ETF1", &["bond1", "bond2", "bond3"]),
                BasketConfig::new("ETF2", &["bond1", "bond2", "bond4"]).disabled(),
            ],
        }
    }
}

impl StrategyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("BASKETMM").separator("__"))
            .build()?;
        Self::from_settings(settings)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(s, FileFormat::Toml))
            .build()?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let cfg: StrategyConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut universe = HashSet::new();
        for p in &self.products {
            if !universe.insert(p.symbol.as_str()) {
                return Err(ConfigError::DuplicateProduct(p.symbol.clone()));
            }
            if p.position_limit <= 0 {
                return Err(ConfigError::InvalidLimit {
                    product: p.symbol.clone(),
                    limit: p.position_limit,
                });
            }
        }
        for basket in &self.baskets {
            basket.validate(&universe)?;
        }
        Ok(())
    }

    pub fn position_limits(&self) -> AHashMap<Product, i64> {
        self.products
            .iter()
            .map(|p| (p.symbol.clone(), p.position_limit))
            .collect()
    }

    pub fn enabled_baskets(&self) -> impl Iterator<Item = &BasketConfig> {
        self.baskets.iter().filter(|b| b.enabled)
    }

    /// Products whose books get normalized each tick: the universe minus any
    /// instrument that only appears as a disabled basket.
    pub fn tracked_products(&self) -> Vec<Product> {
        let needed: HashSet<&str> = self
            .enabled_baskets()
            .flat_map(|b| std::iter::once(b.symbol.as_str()).chain(b.legs.iter().map(String::as_str)))
            .collect();
        let disabled: HashSet<&str> = self
            .baskets
            .iter()
            .filter(|b| !b.enabled)
            .map(|b| b.symbol.as_str())
            .collect();

        self.products
            .iter()
            .map(|p| p.symbol.as_str())
            .filter(|s| !disabled.contains(s) || needed.contains(s))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = StrategyConfig::default();
        cfg.validate().unwrap();

        let enabled: Vec<&str> = cfg.enabled_baskets().map(|b| b.symbol.as_str()).collect();
        assert_eq!(enabled, vec!["ETF1"]);
        assert_eq!(cfg.position_limits()["ETF1"], 40);
    }

    #[test]
    fn test_disabled_basket_not_tracked() {
        let tracked = StrategyConfig::default().tracked_products();
        assert!(!tracked.iter().any(|p| p == "ETF2"));
        assert!(tracked.iter().any(|p| p == "ETF1"));
        assert!(tracked.iter().any(|p| p == "bond4"));
    }

    #[test]
    fn test_from_toml_str() {
        let cfg = StrategyConfig::from_toml_str(
            r#"
            [[products]]
            symbol = "BASKET"
            position_limit = 20

            [[products]]
            symbol = "legA"
            position_limit = 50

            [[products]]
            symbol = "legB"
            position_limit = 50

            [[baskets]]
            symbol = "BASKET"
            legs = ["legA", "legB"]
            half_spread = 1.0
            "#,
        )
        .unwrap();

        let basket = &cfg.baskets[0];
        assert_eq!(basket.symbol, "BASKET");
        assert_eq!(basket.legs, vec!["legA", "legB"]);
        assert!(basket.enabled);
        assert_eq!(basket.half_spread, 1.0);
        assert_eq!(basket.skew_intensity, DEFAULT_SKEW_INTENSITY);
        assert_eq!(basket.maker_quantity, DEFAULT_MAKER_QUANTITY);
    }

    #[test]
    fn test_rejects_unknown_leg() {
        let mut cfg = StrategyConfig::default();
        cfg.baskets[0].legs.push("bond9".into());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnknownProduct { product, .. }) if product == "bond9"
        ));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let mut cfg = StrategyConfig::default();
        cfg.baskets[0].half_spread = -0.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidParameter { field: "half_spread", .. })));

        let mut cfg = StrategyConfig::default();
        cfg.baskets[0].maker_quantity = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidParameter { field: "maker_quantity", .. })));

        let mut cfg = StrategyConfig::default();
        cfg.products[0].position_limit = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidLimit { .. })));
    }

    #[test]
    fn test_rejects_empty_and_self_referencing_baskets() {
        let mut cfg = StrategyConfig::default();
        cfg.baskets[0].legs.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyBasket(_))));

        let mut cfg = StrategyConfig::default();
        cfg.baskets[0].legs.push("ETF1".into());
        assert!(matches!(cfg.validate(), Err(ConfigError::SelfReferencingBasket(_))));
    }

    #[test]
    fn test_rejects_repeated_leg() {
        let mut cfg = StrategyConfig::default();
        cfg.baskets[0].legs = vec!["bond1".into(), "bond1".into(), "bond2".into(), "bond3".into()];
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicateLeg { leg, .. }) if leg == "bond1"
        ));
    }
}
