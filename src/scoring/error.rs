use crate::PlayerId;
use crate::Points;
use thiserror::Error;

/// Why a transition, undo, or load was refused.
///
/// Every variant is recoverable: the table is left exactly as it was and
/// the caller re-prompts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown or misplaced player {0}")]
    InvalidPlayer(PlayerId),
    #[error("reported value must be positive (got {0})")]
    InvalidValue(Points),
    #[error("divisor must be a positive number (got {0})")]
    InvalidDivisor(f64),
    #[error("a shared discard pays 2 or 3 winners (got {0})")]
    InvalidWinnerCount(usize),
    #[error("nothing to undo")]
    EmptyHistory,
    #[error("nothing owed by player {loser} to surrender")]
    NoOpSurrender { loser: PlayerId },
    #[error("malformed session state: {0}")]
    Malformed(#[from] serde_json::Error),
}
