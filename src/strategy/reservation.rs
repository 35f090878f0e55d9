use crate::strategy::fair_value::BasketPrices;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservationPrices {
    pub bid: f64,
    pub ask: f64,
}

impl ReservationPrices {
    // A crossed pair is passed through untouched; the decision step then
    // quotes or takes one-sided.
    pub fn is_crossed(&self) -> bool {
        self.bid > self.ask
    }
}

/// Position normalized by its limit; 0 when the limit is not positive.
pub fn inventory_skew(position: i64, limit: i64) -> f64 {
    if limit <= 0 {
        return 0.0;
    }
    position as f64 / limit as f64
}

/// Anchor the quotes on hedge cost/proceeds, widen by the half-spread, then
/// shift both sides by the same inventory term: long pushes both down, short
/// pushes both up.
pub fn reservation_prices(
    prices: &BasketPrices,
    position: i64,
    limit: i64,
    half_spread: f64,
    skew_intensity: f64,
) -> ReservationPrices {
    let shift = inventory_skew(position, limit) * skew_intensity;
    ReservationPrices {
        bid: prices.sell_price as f64 - half_spread - shift,
        ask: prices.buy_price as f64 + half_spread - shift,
    }
}
