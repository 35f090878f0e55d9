// Market data module entrypoint
pub mod normaliser;     // raw simulator books -> sorted, validated levels

pub use normaliser::{Normaliser, RawOrderBook, RawSide, TickState};
