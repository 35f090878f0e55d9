// Basket market-making strategy, leaf-first
pub mod position;    // remaining buy/sell capacity under position limits
pub mod fair_value;  // basket cost/proceeds from constituent legs
pub mod reservation; // half-spread + inventory skew around fair value
pub mod decision;    // take vs make per side, with hedge legs
pub mod trader;      // per-tick orchestration

pub use decision::{Action, SideDecision};
pub use fair_value::BasketPrices;
pub use position::PositionGuard;
pub use reservation::ReservationPrices;
pub use trader::{BasketOutcome, BasketReport, TickReport, Trader};
