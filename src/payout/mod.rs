pub mod payout;
pub use payout::*;

pub mod stats;
pub use stats::*;
