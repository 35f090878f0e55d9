use thiserror::Error;

use crate::engine::types::{Product, Side};

/// Recoverable pricing failures. A basket that hits one of these simply
/// produces no orders for the tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("insufficient liquidity: {product} has no {side:?} level")]
    InsufficientLiquidity { product: Product, side: Side },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("product {0} is listed more than once")]
    DuplicateProduct(Product),
    #[error("product {product} has non-positive position limit {limit}")]
    InvalidLimit { product: Product, limit: i64 },
    #[error("basket {basket} references unknown product {product}")]
    UnknownProduct { basket: Product, product: Product },
    #[error("basket {0} has no constituent legs")]
    EmptyBasket(Product),
    #[error("basket {basket} lists leg {leg} more than once")]
    DuplicateLeg { basket: Product, leg: Product },
    #[error("basket {0} lists itself as a leg")]
    SelfReferencingBasket(Product),
    #[error("basket {basket}: {field} must be {expected}, got {value}")]
    InvalidParameter {
        basket: Product,
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[cfg(feature = "metrics-exporter")]
    #[error("prometheus exporter install failed: {0}")]
    Exporter(#[from] metrics_exporter_prometheus::BuildError),
    #[error("tracing subscriber already installed")]
    SubscriberInstalled,
}
