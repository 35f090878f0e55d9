use std::collections::HashMap;

use ahash::AHashMap;

use crate::engine::types::{Product, Side};

/// Remaining capacity per product under a symmetric position limit.
///
/// Every order size the strategy emits is bounded by the room reported here.
/// Unknown products have a limit of zero and therefore no room.
#[derive(Debug, Clone, Copy)]
pub struct PositionGuard<'a> {
    positions: &'a HashMap<Product, i64>,
    limits: &'a AHashMap<Product, i64>,
}

impl<'a> PositionGuard<'a> {
    pub fn new(positions: &'a HashMap<Product, i64>, limits: &'a AHashMap<Product, i64>) -> Self {
        Self { positions, limits }
    }

    pub fn position(&self, product: &str) -> i64 {
        self.positions.get(product).copied().unwrap_or(0)
    }

    pub fn limit(&self, product: &str) -> i64 {
        self.limits.get(product).copied().unwrap_or(0)
    }

    pub fn room_to_buy(&self, product: &str) -> u64 {
        clamp_room(self.limit(product).saturating_sub(self.position(product)))
    }

    pub fn room_to_sell(&self, product: &str) -> u64 {
        clamp_room(self.limit(product).saturating_add(self.position(product)))
    }

    pub fn room(&self, product: &str, side: Side) -> u64 {
        match side {
            Side::BUY => self.room_to_buy(product),
            Side::SELL => self.room_to_sell(product),
        }
    }
}

fn clamp_room(room: i64) -> u64 {
    room.max(0).unsigned_abs()
}
