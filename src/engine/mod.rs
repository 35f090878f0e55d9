pub mod book;
pub mod types;

pub use book::{Book, OrderBooks};
pub use types::*;
