//! Quote/cross decision for one side of a basket.
//!
//! For the side we want to trade (buy or sell the basket) there are two
//! branches:
//!
//! - **Take**: the opposing top of book beats our reservation price and every
//!   leg has room in the hedge direction. Cross the basket's opposing level
//!   and hedge it one-for-one by hitting each leg's same-side top of book.
//! - **Make**: otherwise rest a passive quote at the reservation price,
//!   rounded away from the market (floor for bids, ceil for asks).
//!
//! A side with no room for the basket is skipped entirely.

use tracing::debug;

use crate::config::BasketConfig;
use crate::engine::book::OrderBooks;
use crate::engine::types::{Order, PriceLevel, Side};
use crate::strategy::position::PositionGuard;
use crate::strategy::reservation::ReservationPrices;
use crate::telemetry::ORDERS_EMITTED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Take,
    Make,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Take => "take",
            Action::Make => "make",
        }
    }
}

/// What was done on one side of a basket this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideDecision {
    pub side: Side,
    pub action: Action,
    pub price: i64,
    pub size: u64,
    /// Hedge orders emitted alongside (one per leg on Take, none on Make).
    pub hedges: usize,
}

pub struct QuoteContext<'a> {
    pub basket: &'a BasketConfig,
    pub books: &'a OrderBooks,
    pub guard: PositionGuard<'a>,
    pub reservation: ReservationPrices,
}

impl<'a> QuoteContext<'a> {
    /// Evaluate one side, appending any orders to `orders`.
    pub fn decide(&self, side: Side, orders: &mut Vec<Order>) -> Option<SideDecision> {
        let symbol = self.basket.symbol.as_str();
        let room = self.guard.room(symbol, side);
        if room == 0 {
            debug!(basket = symbol, ?side, "No room, side skipped");
            return None;
        }

        let opposing = self.books.book(symbol).best(side.opposite());
        let decision = match opposing.filter(|level| self.beats_reservation(side, level.price)) {
            Some(level) => match self.hedge_levels(side) {
                Some(hedges) => self.take(side, room, level, &hedges, orders),
                None => {
                    debug!(basket = symbol, ?side, "Favourable market but no hedge capacity");
                    self.make(side, room, orders)
                }
            },
            None => self.make(side, room, orders),
        };

        if let Some(d) = &decision {
            metrics::counter!(
                ORDERS_EMITTED,
                "basket" => self.basket.symbol.clone(),
                "action" => d.action.as_str()
            )
            .increment(1 + d.hedges as u64);
        }
        decision
    }

    fn beats_reservation(&self, side: Side, price: i64) -> bool {
        match side {
            Side::BUY => (price as f64) < self.reservation.bid,
            Side::SELL => (price as f64) > self.reservation.ask,
        }
    }

    // Each leg's hedge level and its room in the hedge direction; None when
    // any leg cannot take the hedge.
    fn hedge_levels(&self, side: Side) -> Option<Vec<(&'a str, PriceLevel, u64)>> {
        let hedge_side = side.opposite();
        self.basket
            .legs
            .iter()
            .map(|leg| {
                let room = self.guard.room(leg, hedge_side);
                // Buying the basket sells legs into their bids and vice versa
                let level = self.books.book(leg).best(side)?;
                (room > 0).then_some((leg.as_str(), level, room))
            })
            .collect()
    }

    fn take(
        &self,
        side: Side,
        room: u64,
        level: PriceLevel,
        hedges: &[(&str, PriceLevel, u64)],
        orders: &mut Vec<Order>,
    ) -> Option<SideDecision> {
        let symbol = self.basket.symbol.as_str();
        let hedge_room = hedges.iter().map(|(_, _, r)| *r).min().unwrap_or(0);
        let size = room.min(level.volume).min(hedge_room);
        if size == 0 {
            return None;
        }

        orders.push(order(symbol, side, level.price, size));
        for (leg, leg_level, _) in hedges {
            orders.push(order(leg, side.opposite(), leg_level.price, size));
        }

        debug!(
            basket = symbol,
            ?side,
            price = level.price,
            size,
            legs = hedges.len(),
            reservation_bid = self.reservation.bid,
            reservation_ask = self.reservation.ask,
            "TAKE"
        );
        Some(SideDecision { side, action: Action::Take, price: level.price, size, hedges: hedges.len() })
    }

    fn make(&self, side: Side, room: u64, orders: &mut Vec<Order>) -> Option<SideDecision> {
        let symbol = self.basket.symbol.as_str();
        let size = room.min(self.basket.maker_quantity);
        if size == 0 {
            return None;
        }

        // `as` saturates on out-of-range floats
        let price = match side {
            Side::BUY => self.reservation.bid.floor() as i64,
            Side::SELL => self.reservation.ask.ceil() as i64,
        };
        orders.push(order(symbol, side, price, size));

        debug!(basket = symbol, ?side, price, size, "MAKE");
        Some(SideDecision { side, action: Action::Make, price, size, hedges: 0 })
    }
}

fn order(product: &str, side: Side, price: i64, size: u64) -> Order {
    match side {
        Side::BUY => Order::buy(product, price, size),
        Side::SELL => Order::sell(product, price, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::book::Book;
    use ahash::AHashMap;
    use std::collections::HashMap;

    fn level(price: i64, volume: u64) -> PriceLevel {
        PriceLevel { price, volume }
    }

    fn book(bid: (i64, u64), ask: (i64, u64)) -> Book {
        Book { bids: vec![level(bid.0, bid.1)], asks: vec![level(ask.0, ask.1)] }
    }

    fn books(basket: Book) -> OrderBooks {
        let mut books = OrderBooks::new();
        books.insert("BSK".into(), basket);
        books.insert("a".into(), book((49, 10), (50, 10)));
        books.insert("b".into(), book((50, 10), (50, 10)));
        books
    }

    fn limits() -> AHashMap<String, i64> {
        AHashMap::from_iter([("BSK".to_string(), 40), ("a".to_string(), 40), ("b".to_string(), 40)])
    }

    fn run(
        basket_book: Book,
        positions: &HashMap<String, i64>,
        reservation: ReservationPrices,
        side: Side,
    ) -> (Option<SideDecision>, Vec<Order>) {
        let cfg = BasketConfig::new("BSK", &["a", "b"]);
        let books = books(basket_book);
        let limits = limits();
        let ctx = QuoteContext {
            basket: &cfg,
            books: &books,
            guard: PositionGuard::new(positions, &limits),
            reservation,
        };
        let mut orders = Vec::new();
        let decision = ctx.decide(side, &mut orders);
        (decision, orders)
    }

    const RES: ReservationPrices = ReservationPrices { bid: 98.5, ask: 100.5 };

    #[test]
    fn test_take_buy_with_hedges() {
        let (d, orders) = run(book((97, 3), (98, 5)), &HashMap::new(), RES, Side::BUY);
        let d = d.unwrap();
        assert_eq!(d.action, Action::Take);
        assert_eq!(d.size, 5);
        assert_eq!(
            orders,
            vec![Order::buy("BSK", 98, 5), Order::sell("a", 49, 5), Order::sell("b", 50, 5)]
        );
    }

    #[test]
    fn test_take_sell_hedges_at_leg_asks() {
        let (d, orders) = run(book((101, 7), (103, 5)), &HashMap::new(), RES, Side::SELL);
        assert_eq!(d.unwrap().action, Action::Take);
        assert_eq!(
            orders,
            vec![Order::sell("BSK", 101, 7), Order::buy("a", 50, 7), Order::buy("b", 50, 7)]
        );
    }

    #[test]
    fn test_equal_to_reservation_is_not_favourable() {
        let res = ReservationPrices { bid: 98.0, ask: 100.0 };
        let (d, orders) = run(book((97, 3), (98, 5)), &HashMap::new(), res, Side::BUY);
        assert_eq!(d.unwrap().action, Action::Make);
        assert_eq!(orders, vec![Order::buy("BSK", 98, 10)]);
    }

    #[test]
    fn test_make_rounds_away_from_market() {
        let (_, bids) = run(book((97, 3), (99, 5)), &HashMap::new(), RES, Side::BUY);
        let (_, asks) = run(book((97, 3), (99, 5)), &HashMap::new(), RES, Side::SELL);
        assert_eq!(bids, vec![Order::buy("BSK", 98, 10)]);
        assert_eq!(asks, vec![Order::sell("BSK", 101, 10)]);
    }

    #[test]
    fn test_leg_without_hedge_room_falls_back_to_make() {
        let positions = HashMap::from([("b".to_string(), -40)]);
        let (d, orders) = run(book((97, 3), (98, 5)), &positions, RES, Side::BUY);
        assert_eq!(d.unwrap().action, Action::Make);
        assert_eq!(orders, vec![Order::buy("BSK", 98, 10)]);
    }

    #[test]
    fn test_take_capped_by_room_and_hedge_room() {
        let positions = HashMap::from([("BSK".to_string(), 37), ("a".to_string(), -38)]);
        let (d, orders) = run(book((97, 3), (98, 50)), &positions, RES, Side::BUY);
        let d = d.unwrap();
        assert_eq!(d.action, Action::Take);
        assert_eq!(d.size, 2);
        assert!(orders.iter().all(|o| o.size() == 2));
    }

    #[test]
    fn test_make_capped_by_room() {
        let positions = HashMap::from([("BSK".to_string(), -36)]);
        let (_, orders) = run(book((97, 3), (99, 5)), &positions, RES, Side::SELL);
        assert_eq!(orders, vec![Order::sell("BSK", 101, 4)]);
    }

    #[test]
    fn test_no_room_emits_nothing() {
        let positions = HashMap::from([("BSK".to_string(), 40)]);
        let (d, orders) = run(book((97, 3), (90, 5)), &positions, RES, Side::BUY);
        assert!(d.is_none());
        assert!(orders.is_empty());
    }

    #[test]
    fn test_empty_basket_book_makes() {
        let (d, orders) = run(Book::new(), &HashMap::new(), RES, Side::BUY);
        assert_eq!(d.unwrap().action, Action::Make);
        assert_eq!(orders.len(), 1);
    }
}
