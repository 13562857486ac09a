use super::*;
use crate::Points;
use crate::scoring::Bonus;
use crate::scoring::ScoreChange;

/// Result of running an action against a table, committed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub table: Table,
    pub changes: Vec<ScoreChange>,
    pub bonuses: Vec<Bonus>,
}

impl Outcome {
    /// Net of all deltas. Zero for every well-formed outcome.
    pub fn net(&self) -> Points {
        self.changes.iter().map(|c| c.delta).sum()
    }
}
