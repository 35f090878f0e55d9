use ahash::AHashMap;
use tracing::{debug, instrument};

use crate::config::{BasketConfig, StrategyConfig};
use crate::engine::book::OrderBooks;
use crate::engine::types::{Order, Product, Side};
use crate::error::{ConfigError, PricingError};
use crate::market_data::normaliser::{Normaliser, TickState};
use crate::strategy::decision::{QuoteContext, SideDecision};
use crate::strategy::fair_value::{basket_prices, BasketPrices};
use crate::strategy::position::PositionGuard;
use crate::strategy::reservation::{reservation_prices, ReservationPrices};
use crate::telemetry::{BASKETS_SKIPPED, RESERVATION_ASK, RESERVATION_BID};

#[derive(Debug, Clone, PartialEq)]
pub enum BasketOutcome {
    Priced {
        prices: BasketPrices,
        reservation: ReservationPrices,
        buy: Option<SideDecision>,
        sell: Option<SideDecision>,
    },
    Skipped(PricingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasketReport {
    pub basket: Product,
    pub outcome: BasketOutcome,
}

/// Everything one tick produced: the orders plus how each basket got there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub orders: Vec<Order>,
    pub baskets: Vec<BasketReport>,
}

/// Per-tick entry point. Holds only configuration; every call is independent
/// of the previous one.
#[derive(Debug, Clone)]
pub struct Trader {
    config: StrategyConfig,
    normaliser: Normaliser,
    limits: AHashMap<Product, i64>,
}

impl Trader {
    /// Validates `config` before any tick can run against it.
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: StrategyConfig) -> Self {
        let normaliser = Normaliser::new(config.tracked_products());
        let limits = config.position_limits();
        Self { config, normaliser, limits }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Orders for this tick. Empty when no basket could be priced.
    pub fn run(&self, state: &TickState) -> Vec<Order> {
        self.evaluate(state).orders
    }

    #[instrument(level = "debug", skip_all, fields(positions = state.positions.len()))]
    pub fn evaluate(&self, state: &TickState) -> TickReport {
        let books = self.normaliser.normalise(&state.orderbook);
        let guard = PositionGuard::new(&state.positions, &self.limits);

        let mut report = TickReport::default();
        for basket in self.config.enabled_baskets() {
            let outcome = self.evaluate_basket(basket, &books, guard, &mut report.orders);
            report.baskets.push(BasketReport { basket: basket.symbol.clone(), outcome });
        }

        debug!(orders = report.orders.len(), "Tick evaluated");
        report
    }

    fn evaluate_basket(
        &self,
        basket: &BasketConfig,
        books: &OrderBooks,
        guard: PositionGuard<'_>,
        orders: &mut Vec<Order>,
    ) -> BasketOutcome {
        let prices = match basket_prices(books, &basket.legs) {
            Ok(prices) => prices,
            Err(e) => {
                debug!(basket = %basket.symbol, error = %e, "Basket skipped");
                metrics::counter!(BASKETS_SKIPPED, "basket" => basket.symbol.clone()).increment(1);
                return BasketOutcome::Skipped(e);
            }
        };

        let reservation = reservation_prices(
            &prices,
            guard.position(&basket.symbol),
            guard.limit(&basket.symbol),
            basket.half_spread,
            basket.skew_intensity,
        );
        metrics::gauge!(RESERVATION_BID, "basket" => basket.symbol.clone()).set(reservation.bid);
        metrics::gauge!(RESERVATION_ASK, "basket" => basket.symbol.clone()).set(reservation.ask);
        debug!(
            basket = %basket.symbol,
            buy_price = prices.buy_price,
            sell_price = prices.sell_price,
            reservation_bid = reservation.bid,
            reservation_ask = reservation.ask,
            crossed = reservation.is_crossed(),
            "Basket priced"
        );

        let ctx = QuoteContext { basket, books, guard, reservation };
        let buy = ctx.decide(Side::BUY, orders);
        let sell = ctx.decide(Side::SELL, orders);

        BasketOutcome::Priced { prices, reservation, buy, sell }
    }
}

impl Default for Trader {
    fn default() -> Self {
        // The built-in config is checked by the config tests.
        Self::from_valid(StrategyConfig::default())
    }
}
