pub mod config;
pub mod engine;
pub mod error;
pub mod market_data;
pub mod strategy;
pub mod telemetry;

pub use crate::config::{BasketConfig, ProductConfig, StrategyConfig};
pub use engine::types::{Order, PriceLevel, Product, Side};
pub use error::{ConfigError, PricingError};
pub use market_data::TickState;
pub use strategy::Trader;
