use super::*;
use crate::PlayerId;
use crate::Points;
use crate::payout::Payout;
use crate::payout::Stats;
use crate::players::Registry;
use crate::scoring::Action;
use crate::scoring::Error;
use crate::scoring::ScoreChange;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// The single authoritative game: live table plus everything that led to it.
///
/// One mutator at a time. Each successful [`apply`](Self::apply) pushes
/// exactly one history entry, each [`undo`](Self::undo) pops one. The whole
/// value serializes as-is, with no derived fields, so a reloaded session
/// scores every later action exactly as the saved session would have.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    table: Table,
    history: History,
}

impl Session {
    pub fn new(players: Registry) -> Self {
        Self {
            table: Table::new(players),
            history: History::default(),
        }
    }
    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn history(&self) -> &History {
        &self.history
    }
    pub fn players(&self) -> &Registry {
        self.table.players()
    }

    /// Commits an action and returns its score changes.
    pub fn apply(&mut self, action: Action) -> Result<&[ScoreChange], Error> {
        let description = action.describe(self.players());
        let outcome = match self.table.apply(&action) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("[session] rejected \"{}\": {}", description, e);
                return Err(e);
            }
        };
        debug_assert_eq!(outcome.net(), 0, "score changes must net to zero");
        log::info!("[session] {}", description);
        let before = std::mem::replace(&mut self.table, outcome.table);
        self.history.push(Entry::new(before, action, outcome.changes));
        Ok(self.history.last().map(Entry::changes).unwrap_or_default())
    }
    /// Restores the table from before the latest action.
    pub fn undo(&mut self) -> Result<&Table, Error> {
        let before = self.history.pop()?;
        log::info!("[session] undo, {} entries left", self.history.len());
        self.table = before;
        Ok(&self.table)
    }
    /// Starts a new game with the same players.
    pub fn reset(&mut self) {
        log::info!("[session] reset after {} entries", self.history.len());
        *self = Self::new(self.players().clone());
    }

    /// Cumulative score per player over the whole history.
    pub fn totals(&self) -> BTreeMap<PlayerId, Points> {
        self.history.totals(self.players())
    }
    /// Settlement per player: `total / divisor + adjustment`, all zero when
    /// the divisor is unusable.
    pub fn payout(&self, divisor: f64, adjustments: &BTreeMap<PlayerId, f64>) -> BTreeMap<PlayerId, f64> {
        Payout::new(divisor, adjustments.clone()).project(&self.totals())
    }
    pub fn stats(&self) -> Stats {
        Stats::from((self.players(), &self.history))
    }

    /// Serializes the whole session.
    pub fn save(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    /// Restores a session saved by [`save`](Self::save), checking that
    /// every id it mentions belongs to its players and that every recorded
    /// table seats the same players.
    pub fn load(blob: &str) -> Result<Self, Error> {
        let Self { table, history } = serde_json::from_str::<Self>(blob)?;
        let table = table.validated()?;
        let history = history.validated(table.players())?;
        log::debug!("[session] loaded {} entries", history.len());
        Ok(Self { table, history })
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.table)?;
        let totals = self.totals();
        let totals = self
            .players()
            .players()
            .iter()
            .map(|p| format!("{} {:+}", p.name(), totals.get(&p.id()).copied().unwrap_or(0)))
            .collect::<Vec<_>>();
        writeln!(f, "totals: {}", totals.join("  "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::MAX_POINTS;

    fn session() -> Session {
        Session::new(Registry::named(["A", "B", "C", "D"]).unwrap())
    }

    #[test]
    fn apply_returns_changes_and_records_them() {
        let mut s = session();
        let changes = s
            .apply(Action::SelfDrawn {
                winner: 1,
                points: 2,
            })
            .unwrap()
            .to_vec();
        assert_eq!(changes[0], ScoreChange::new(1, 9));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.totals()[&1], 9);
        assert_eq!(s.history().last().unwrap().description(), "A self-draws 2");
    }

    #[test]
    fn rejection_changes_nothing() {
        let mut s = session();
        s.apply(Action::Target {
            winner: 2,
            loser: 1,
            points: 3,
        })
        .unwrap();
        let before = s.clone();
        let own = Action::Target {
            winner: 2,
            loser: 2,
            points: 3,
        };
        assert!(s.apply(own).is_err());
        assert!(s.apply(Action::Surrender { loser: 3 }).is_err());
        let lonely = Action::Multi {
            loser: 1,
            winners: vec![],
        };
        assert!(s.apply(lonely).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn undo_restores_previous_table() {
        let mut s = session();
        s.apply(Action::SelfDrawn {
            winner: 1,
            points: 2,
        })
        .unwrap();
        let before = s.table().clone();
        s.apply(Action::Target {
            winner: 3,
            loser: 1,
            points: 5,
        })
        .unwrap();
        assert_ne!(s.table(), &before);
        assert_eq!(s.undo().unwrap(), &before);
        assert_eq!(s.history().len(), 1);
        s.undo().unwrap();
        assert!(matches!(s.undo(), Err(Error::EmptyHistory)));
        assert_eq!(s, session());
    }

    #[test]
    fn random_play_stays_zero_sum_and_undoable() {
        let mut s = session();
        for _ in 0..512 {
            let before = s.clone();
            let action = Action::random();
            match s.apply(action.clone()).map(|c| c.to_vec()) {
                Ok(changes) => {
                    assert_eq!(changes.iter().map(|c| c.delta).sum::<Points>(), 0, "{:?}", action);
                    let mut rewound = s.clone();
                    rewound.undo().unwrap();
                    assert_eq!(rewound, before, "{:?}", action);
                }
                Err(_) => assert_eq!(s, before, "{:?}", action),
            }
            assert!(s.table().owed().winners().count() <= 3);
            assert!(s.table().dealer().consecutive() >= 1);
            for (winner, loser, _) in s.table().owed().entries() {
                assert!(s.table().la().get(winner, loser) > 0);
            }
            for (winner, loser, _) in s.table().la().entries() {
                assert!(s.table().owed().get(winner, loser) > 0);
            }
        }
        assert_eq!(s.totals().values().sum::<Points>(), 0);
    }

    #[test]
    fn huge_reports_are_refused_without_panicking() {
        let mut s = session();
        let max = Action::Target {
            winner: 2,
            loser: 1,
            points: Points::MAX,
        };
        assert!(matches!(s.apply(max), Err(Error::InvalidValue(Points::MAX))));
        let pay = Action::Pay {
            player: 3,
            amount: Points::MAX,
        };
        assert!(s.apply(pay).is_err());
        let explode = Action::Explode {
            player: 1,
            payouts: [(2, Points::MAX), (3, Points::MAX)].into_iter().collect(),
        };
        assert!(s.apply(explode).is_err());
        assert!(s.history().is_empty());
        // la compounding climbs toward the ceiling until it is refused
        let hit = Action::Target {
            winner: 2,
            loser: 3,
            points: MAX_POINTS / 4,
        };
        let accepted = std::iter::repeat_with(|| s.apply(hit.clone()).is_ok())
            .take(8)
            .take_while(|&ok| ok)
            .count();
        assert!(accepted < 8);
        assert!(s.table().owed().get(2, 3) <= MAX_POINTS);
        assert_eq!(s.totals().values().sum::<Points>(), 0);
    }

    #[test]
    fn save_and_load_reproduce_future_scoring() {
        let mut s = session();
        s.apply(Action::SelfDrawn {
            winner: 1,
            points: 2,
        })
        .unwrap();
        s.apply(Action::Target {
            winner: 1,
            loser: 2,
            points: 4,
        })
        .unwrap();
        let mut loaded = Session::load(&s.save().unwrap()).unwrap();
        assert_eq!(loaded, s);
        let next = Action::Target {
            winner: 1,
            loser: 2,
            points: 3,
        };
        assert_eq!(
            loaded.apply(next.clone()).unwrap().to_vec(),
            s.apply(next).unwrap().to_vec()
        );
        assert_eq!(loaded, s);
    }

    #[test]
    fn load_rejects_garbage() {
        assert!(matches!(Session::load("{"), Err(Error::Malformed(_))));
        let mut s = session();
        s.apply(Action::Transfer { dealer: 3 }).unwrap();
        let blob = s.save().unwrap().replace("\"consecutive\": 1", "\"consecutive\": 0");
        assert!(matches!(Session::load(&blob), Err(Error::InvalidValue(0))));
        let mut blob = serde_json::from_str::<serde_json::Value>(&s.save().unwrap()).unwrap();
        blob["table"]["dealer"]["id"] = 9.into();
        assert!(matches!(Session::load(&blob.to_string()), Err(Error::InvalidPlayer(9))));
    }

    #[test]
    fn load_rejects_history_from_another_table() {
        let mut s = session();
        s.apply(Action::Extend).unwrap();
        s.apply(Action::Transfer { dealer: 2 }).unwrap();
        let mut blob = serde_json::from_str::<serde_json::Value>(&s.save().unwrap()).unwrap();
        blob["history"][0]["before"]["players"][1]["name"] = "Zed".into();
        assert!(matches!(Session::load(&blob.to_string()), Err(Error::InvalidPlayer(2))));
        let mut blob = serde_json::from_str::<serde_json::Value>(&s.save().unwrap()).unwrap();
        blob["history"][1]["before"]["players"][3]["id"] = 8.into();
        assert!(matches!(Session::load(&blob.to_string()), Err(Error::InvalidPlayer(8))));
    }

    #[test]
    fn load_keeps_normalized_history() {
        let mut s = session();
        s.apply(Action::Target {
            winner: 2,
            loser: 3,
            points: 4,
        })
        .unwrap();
        s.apply(Action::Extend).unwrap();
        let mut blob = serde_json::from_str::<serde_json::Value>(&s.save().unwrap()).unwrap();
        blob["history"][1]["before"]["owed"]["2"]["4"] = 0.into();
        let mut loaded = Session::load(&blob.to_string()).unwrap();
        assert_eq!(loaded, s);
        loaded.undo().unwrap();
        assert_eq!(loaded.table().owed().row(2).count(), 1);
    }

    #[test]
    fn reset_keeps_players_only() {
        let mut s = session();
        s.apply(Action::SelfDrawn {
            winner: 2,
            points: 2,
        })
        .unwrap();
        s.reset();
        assert_eq!(s, session());
    }

    #[test]
    fn payout_divides_totals() {
        let mut s = session();
        s.apply(Action::Target {
            winner: 2,
            loser: 3,
            points: 10,
        })
        .unwrap();
        let adjust = [(1, 0.5)].into_iter().collect();
        let payout = s.payout(4.0, &adjust);
        assert_eq!(payout[&2], 2.5);
        assert_eq!(payout[&3], -2.5);
        assert_eq!(payout[&1], 0.5);
        assert!(s.payout(0.0, &adjust).values().all(|&p| p == 0.0));
    }
}
