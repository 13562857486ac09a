use super::*;
use crate::PlayerId;
use crate::Points;
use serde::Deserialize;
use serde::Serialize;

/// One winner's outstanding row, as it stands before being cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub winner: PlayerId,
    pub owed: Vec<(PlayerId, Points)>,
}

/// Rows of every active winner outside `keep`. These are exactly the rows
/// [`reset_other_lineages`] would clear.
pub fn other_lineages(owed: &WinLedger, keep: &[PlayerId]) -> Vec<Lineage> {
    owed.winners()
        .filter(|w| !keep.contains(w))
        .map(|winner| Lineage {
            winner,
            owed: owed.row(winner).collect(),
        })
        .collect()
}

/// Clears owed points and la-counters of every winner outside `keep`.
///
/// Only one winning lineage may be active, so whenever a new one takes over
/// the table this runs before the new winner's row is written.
pub fn reset_other_lineages(owed: &mut WinLedger, la: &mut LaCounts, keep: &[PlayerId]) {
    for lineage in other_lineages(owed, keep) {
        log::debug!("[ledger] clearing lineage of P{}", lineage.winner);
    }
    owed.retain_rows(keep);
    la.retain_rows(keep);
}

impl std::fmt::Display for Lineage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let owed = self
            .owed
            .iter()
            .map(|(loser, points)| format!("P{}:{}", loser, points))
            .collect::<Vec<_>>();
        write!(f, "P{} <- {}", self.winner, owed.join(" "))
    }
}
