use crate::engine::book::OrderBooks;
use crate::engine::types::{Product, Side};
use crate::error::PricingError;

/// What it costs to assemble the basket from its legs at market, and what
/// breaking it back into legs would fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasketPrices {
    /// Sum of each leg's best ask.
    pub buy_price: i64,
    /// Sum of each leg's best bid.
    pub sell_price: i64,
}

pub fn basket_prices(books: &OrderBooks, legs: &[Product]) -> Result<BasketPrices, PricingError> {
    let mut buy_price = 0i64;
    let mut sell_price = 0i64;

    for leg in legs {
        let book = books.book(leg);
        let missing = |side| PricingError::InsufficientLiquidity { product: leg.clone(), side };
        let ask = book.best_ask().ok_or_else(|| missing(Side::SELL))?;
        let bid = book.best_bid().ok_or_else(|| missing(Side::BUY))?;

        buy_price = buy_price.saturating_add(ask.price);
        sell_price = sell_price.saturating_add(bid.price);
    }

    Ok(BasketPrices { buy_price, sell_price })
}
