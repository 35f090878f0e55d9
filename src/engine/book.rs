use ahash::AHashMap;
use tracing::trace;

use crate::engine::types::{PriceLevel, Product, Side};

static EMPTY_BOOK: Book = Book { bids: Vec::new(), asks: Vec::new() };

/// Normalized snapshot of one product's book.
///
/// `bids` are sorted by price descending and `asks` ascending, so the best
/// level on either side is always at index 0. No two levels on a side share a
/// price and every level carries positive volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }

    pub fn best(&self, side: Side) -> Option<PriceLevel> {
        match side {
            Side::BUY => self.best_bid(),
            Side::SELL => self.best_ask(),
        }
    }

    // Ticks between the top levels; negative on a crossed snapshot.
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            (bid, ask) => {
                trace!(has_bid = bid.is_some(), has_ask = ask.is_some(), "One-sided book has no spread");
                None
            }
        }
    }

    pub fn mid(&self) -> Option<f64> {
        let (bid, ask) = (self.best_bid()?, self.best_ask()?);
        Some((bid.price + ask.price) as f64 / 2.0)
    }
}

/// Books for every tracked product in a tick.
#[derive(Debug, Clone, Default)]
pub struct OrderBooks {
    books: AHashMap<Product, Book>
}

impl OrderBooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: Product, book: Book) {
        self.books.insert(product, book);
    }

    // Untracked or absent products read as an empty book.
    pub fn book(&self, product: &str) -> &Book {
        self.books.get(product).unwrap_or(&EMPTY_BOOK)
    }
}
