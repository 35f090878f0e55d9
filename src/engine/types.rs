use serde::{Deserialize, Serialize};

/// Instrument identifier, e.g. "ETF1" or "bond2".
pub type Product = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    BUY,
    SELL
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

// One resting level of a normalized book. Volume is always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: i64,
    pub volume: u64
}

/// Order handed back to the simulator.
///
/// Positive quantity buys, negative quantity sells. Every order emitted for a
/// tick replaces whatever was resting from the previous tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub product: Product,
    pub price: i64,
    pub quantity: i64
}

impl Order {
    pub fn buy(product: &str, price: i64, size: u64) -> Self {
        Self { product: product.to_string(), price, quantity: to_signed(size) }
    }

    pub fn sell(product: &str, price: i64, size: u64) -> Self {
        Self { product: product.to_string(), price, quantity: -to_signed(size) }
    }

    pub fn side(&self) -> Side {
        if self.quantity >= 0 { Side::BUY } else { Side::SELL }
    }

    pub fn size(&self) -> u64 {
        self.quantity.unsigned_abs()
    }
}

// Sizes come from positive i64 volumes and limits, so this never saturates in practice.
fn to_signed(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}
