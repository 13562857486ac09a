use crate::PlayerId;
use crate::Points;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Directed matrix of non-negative values keyed by `(winner, loser)`.
///
/// Stored sparse: zero entries and empty rows are never kept, so two
/// matrices holding the same non-zero entries compare equal regardless of
/// how they got there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairs(BTreeMap<PlayerId, BTreeMap<PlayerId, Points>>);

/// Points currently owed by each loser to each winner.
pub type WinLedger = Pairs;
/// Consecutive hits by each winner against each loser while its streak lasts.
pub type LaCounts = Pairs;

impl Pairs {
    /// Value for `(winner, loser)`, zero when absent.
    pub fn get(&self, winner: PlayerId, loser: PlayerId) -> Points {
        self.0
            .get(&winner)
            .and_then(|row| row.get(&loser))
            .copied()
            .unwrap_or(0)
    }
    /// Overwrites `(winner, loser)`. Writing zero removes the entry.
    pub fn set(&mut self, winner: PlayerId, loser: PlayerId, value: Points) {
        debug_assert!(value >= 0, "pair values are non-negative");
        if value > 0 {
            self.0.entry(winner).or_default().insert(loser, value);
        } else if let Some(row) = self.0.get_mut(&winner) {
            row.remove(&loser);
            if row.is_empty() {
                self.0.remove(&winner);
            }
        }
    }
    /// Adds one to `(winner, loser)` and returns the new value.
    pub fn bump(&mut self, winner: PlayerId, loser: PlayerId) -> Points {
        let next = self.get(winner, loser) + 1;
        self.set(winner, loser, next);
        next
    }
    /// Non-zero entries of a winner's row, by loser id.
    pub fn row(&self, winner: PlayerId) -> impl Iterator<Item = (PlayerId, Points)> + '_ {
        self.0
            .get(&winner)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&l, &v)| (l, v)))
    }
    /// True if the winner holds anything against anyone.
    pub fn is_active(&self, winner: PlayerId) -> bool {
        self.0.contains_key(&winner)
    }
    /// Winners with at least one non-zero entry.
    pub fn winners(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.0.keys().copied()
    }
    /// Drops every row whose winner is not kept.
    pub fn retain_rows(&mut self, keep: &[PlayerId]) {
        self.0.retain(|winner, _| keep.contains(winner));
    }
    /// Every non-zero entry as `(winner, loser, value)`.
    pub fn entries(&self) -> impl Iterator<Item = (PlayerId, PlayerId, Points)> + '_ {
        self.0
            .iter()
            .flat_map(|(&w, row)| row.iter().map(move |(&l, &v)| (w, l, v)))
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PlayerId, PlayerId, Points)> for Pairs {
    fn from_iter<I: IntoIterator<Item = (PlayerId, PlayerId, Points)>>(iter: I) -> Self {
        let mut pairs = Self::default();
        for (winner, loser, value) in iter {
            pairs.set(winner, loser, value);
        }
        pairs
    }
}
