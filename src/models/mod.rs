pub mod candidate;
pub mod fields;
pub mod parse;
pub mod trade;

pub use candidate::{validate, TradeCandidate};
pub use fields::*;
pub use parse::coerce_finite;
pub use trade::{NewTrade, PendingTrade, Trade, TradeSet};
