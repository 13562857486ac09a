use crate::PlayerId;
use crate::Points;
use serde::Deserialize;
use serde::Serialize;

/// One player's net effect from a resolved action.
///
/// The deltas of a single action always sum to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreChange {
    pub player: PlayerId,
    pub delta: Points,
}

impl ScoreChange {
    pub fn new(player: PlayerId, delta: Points) -> Self {
        Self { player, delta }
    }
}

impl From<(PlayerId, Points)> for ScoreChange {
    fn from((player, delta): (PlayerId, Points)) -> Self {
        Self::new(player, delta)
    }
}

impl std::fmt::Display for ScoreChange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "P{} {:+}", self.player, self.delta)
    }
}
