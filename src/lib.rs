//! Scoring engine for a four-player mahjong table.
//!
//! Tracks who deals, how long the dealer has held the seat, who leads the
//! current winning lineage, and the points every loser currently owes that
//! lineage. Reported wins are turned into point deltas by [`scoring::Bonus`],
//! committed by [`engine::Table`], and recorded in a revocable
//! [`engine::History`].
pub mod advice;
pub mod engine;
pub mod ledger;
pub mod payout;
pub mod players;
pub mod scoring;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stable player identity. Never reused within a session.
pub type PlayerId = u32;
/// Table points: owed amounts, hits, and signed score deltas.
pub type Points = i64;

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Number of seats at the table.
pub const SEATS: usize = 4;
/// La-count at which a loser is offered the option to surrender a pair.
pub const SURRENDER_THRESHOLD: Points = 3;
/// Fewest winners a single discard may pay at once.
pub const MULTI_MIN: usize = 2;
/// Most winners a single discard may pay at once.
pub const MULTI_MAX: usize = 3;
/// Ceiling for any reported value, dealer bonus, hit or owed total.
/// Anything larger is refused with [`scoring::Error::InvalidValue`].
pub const MAX_POINTS: Points = 1 << 48;

// ============================================================================
// SUGGESTION BATCH SHAPE
// ============================================================================
/// Rows in a suggestion batch, one per seat.
pub const SUGGEST_ROWS: usize = SEATS;
/// Raw numeric inputs per row.
pub const SUGGEST_COLS: usize = 6;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for tests and benchmarks.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize terminal logging at the given level.
#[cfg(feature = "cli")]
pub fn log(level: log::LevelFilter) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term]).expect("initialize logger");
}
