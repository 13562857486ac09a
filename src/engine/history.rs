use super::*;
use crate::PlayerId;
use crate::Points;
use crate::players::Registry;
use crate::scoring::Action;
use crate::scoring::Error;
use crate::scoring::ScoreChange;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// One committed action and the table as it stood just before it.
///
/// `before` is an owned copy, so nothing done to the live table afterwards
/// can reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    before: Table,
    action: Action,
    description: String,
    changes: Vec<ScoreChange>,
}

impl Entry {
    pub fn new(before: Table, action: Action, changes: Vec<ScoreChange>) -> Self {
        Self {
            description: action.describe(before.players()),
            before,
            action,
            changes,
        }
    }
    pub fn before(&self) -> &Table {
        &self.before
    }
    pub fn action(&self) -> &Action {
        &self.action
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn changes(&self) -> &[ScoreChange] {
        &self.changes
    }
    /// This entry's delta for one player, zero if untouched.
    pub fn delta(&self, player: PlayerId) -> Points {
        self.changes
            .iter()
            .filter(|c| c.player == player)
            .map(|c| c.delta)
            .sum()
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let changes = self
            .changes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>();
        write!(f, "{:<40} {}", self.description, changes.join(" "))
    }
}

/// Append-only stack of committed actions. Only [`pop`](Self::pop) removes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History(Vec<Entry>);

impl History {
    pub fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }
    /// Removes the latest entry and hands back the table it recorded.
    pub fn pop(&mut self) -> Result<Table, Error> {
        self.0
            .pop()
            .map(|entry| entry.before)
            .ok_or(Error::EmptyHistory)
    }
    /// Oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.0
    }
    pub fn last(&self) -> Option<&Entry> {
        self.0.last()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Sum of every recorded delta, per registered player.
    pub fn totals(&self, registry: &Registry) -> BTreeMap<PlayerId, Points> {
        let mut totals = registry.ids().map(|id| (id, 0)).collect::<BTreeMap<_, Points>>();
        for change in self.0.iter().flat_map(|e| e.changes.iter()) {
            let total = totals.entry(change.player).or_default();
            *total = total.saturating_add(change.delta);
        }
        totals
    }
    /// Checks every recorded table of a loaded history and keeps the
    /// normalized copies. Each must seat exactly `players`, or undoing
    /// into it would swap the table's registry.
    pub fn validated(self, players: &Registry) -> Result<Self, Error> {
        self.0
            .into_iter()
            .map(|entry| {
                let before = entry.before.validated()?;
                match before
                    .players()
                    .players()
                    .iter()
                    .zip(players.players())
                    .find(|(recorded, live)| recorded != live)
                {
                    Some((recorded, _)) => Err(Error::InvalidPlayer(recorded.id())),
                    None => Ok(Entry { before, ..entry }),
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
