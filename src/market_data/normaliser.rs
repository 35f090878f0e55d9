// Convert the simulator's raw price -> volume maps into sorted, validated books.
// Anything with non-positive volume is dropped here and never reaches pricing.

use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;
use serde::Deserialize;
use tracing::trace;

use crate::engine::book::{Book, OrderBooks};
use crate::engine::types::{PriceLevel, Product, Side};

/// price -> volume for one side of one product.
pub type RawSide = HashMap<i64, i64>;

/// product -> side -> price -> volume, exactly as the simulator hands it over.
pub type RawOrderBook = HashMap<Product, HashMap<Side, RawSide>>;

/// Per-tick state supplied by the simulator. Read-only to the strategy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickState {
    #[serde(default)]
    pub orderbook: RawOrderBook,
    #[serde(default)]
    pub positions: HashMap<Product, i64>,
}

impl TickState {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn position(&self, product: &str) -> i64 {
        self.positions.get(product).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Normaliser {
    pub tracked: Vec<Product>,
}

impl Normaliser {
    pub fn new(tracked: Vec<Product>) -> Self {
        Self { tracked }
    }

    /// Build a book for every tracked product. Products missing from `raw`
    /// (or missing a side) get empty sides; untracked products are ignored.
    pub fn normalise(&self, raw: &RawOrderBook) -> OrderBooks {
        let mut books = OrderBooks::new();
        for product in &self.tracked {
            let book = match raw.get(product) {
                Some(sides) => Book {
                    bids: side_levels(product, Side::BUY, sides.get(&Side::BUY)),
                    asks: side_levels(product, Side::SELL, sides.get(&Side::SELL)),
                },
                None => Book::new(),
            };
            books.insert(product.clone(), book);
        }
        books
    }
}

fn side_levels(product: &str, side: Side, raw: Option<&RawSide>) -> Vec<PriceLevel> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let valid = raw.iter().filter_map(|(&price, &volume)| {
        if volume > 0 {
            Some(PriceLevel { price, volume: volume.unsigned_abs() })
        } else {
            trace!(product, ?side, price, volume, "Discarding level with non-positive volume");
            None
        }
    });

    // Bids best-first means descending, asks ascending
    match side {
        Side::BUY => valid.sorted_unstable_by_key(|l| Reverse(l.price)).collect(),
        Side::SELL => valid.sorted_unstable_by_key(|l| l.price).collect(),
    }
}
