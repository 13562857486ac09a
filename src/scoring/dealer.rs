use super::*;
use crate::MAX_POINTS;
use crate::PlayerId;
use crate::Points;
use serde::Deserialize;
use serde::Serialize;

/// Who holds the dealer seat and for how many consecutive rounds.
///
/// `consecutive` is at least 1: it restarts at 1 whenever the seat changes
/// hands and grows by one each time the sitting dealer wins again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dealer {
    id: PlayerId,
    consecutive: Points,
}

impl Dealer {
    pub fn new(id: PlayerId) -> Self {
        Self { id, consecutive: 1 }
    }
    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn consecutive(&self) -> Points {
        self.consecutive
    }
    pub fn is(&self, id: PlayerId) -> bool {
        self.id == id
    }
    /// Bonus owed on any pairing that involves the dealer: `2n - 1`.
    /// Fails once the run is long enough to push it past [`MAX_POINTS`].
    pub fn bonus(&self) -> Result<Points, Error> {
        self.consecutive
            .checked_mul(2)
            .map(|double| double - 1)
            .filter(|&bonus| bonus <= MAX_POINTS)
            .ok_or(Error::InvalidValue(self.consecutive))
    }
    /// True if either side of the pairing holds the seat.
    pub fn involves(&self, winner: PlayerId, loser: PlayerId) -> bool {
        self.is(winner) || self.is(loser)
    }
    /// Seat passes to the winner, or the sitting dealer extends its run.
    pub fn advance(&mut self, winner: PlayerId) {
        if self.is(winner) {
            self.extend();
        } else {
            self.transfer(winner);
        }
    }
    /// Hands the seat to `id` with a fresh run.
    pub fn transfer(&mut self, id: PlayerId) {
        self.id = id;
        self.consecutive = 1;
    }
    /// Extends the current run without a win.
    pub fn extend(&mut self) {
        self.consecutive = self.consecutive.saturating_add(1);
    }
}

impl std::fmt::Display for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.consecutive {
            1 => write!(f, "P{} deals", self.id),
            n => write!(f, "P{} deals ({} in a row)", self.id, n),
        }
    }
}
