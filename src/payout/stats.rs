use crate::PlayerId;
use crate::Points;
use crate::engine::History;
use crate::players::Registry;
use std::collections::BTreeMap;

/// One player's performance over a session.
///
/// A *round* is any history entry carrying a score change for the player;
/// a *win* is a round with a positive change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub player: PlayerId,
    pub name: String,
    pub wins: usize,
    pub rounds: usize,
    pub total: Points,
    pub average: Points,
    pub best: Points,
    pub worst: Points,
    pub spread: Points,
    pub win_rate: Points,
}

impl Record {
    fn new(player: PlayerId, name: String, deltas: &[Points], entries: usize) -> Self {
        let mut record = Self {
            player,
            name,
            ..Self::default()
        };
        if deltas.is_empty() {
            return record;
        }
        let n = deltas.len() as f64;
        record.rounds = deltas.len();
        record.wins = deltas.iter().filter(|&&d| d > 0).count();
        record.total = deltas.iter().fold(0, |sum, &d| sum.saturating_add(d));
        record.average = round(record.total as f64 / n);
        record.best = deltas.iter().copied().max().unwrap_or_default();
        record.worst = deltas.iter().copied().min().unwrap_or_default();
        let variance = deltas
            .iter()
            .map(|&d| (d - record.average) as f64)
            .map(|x| x * x)
            .sum::<f64>()
            / n;
        record.spread = round(variance.sqrt());
        record.win_rate = round(record.wins as f64 / entries as f64 * 100.);
        record
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<12} {:>+6}  wins {:>3} ({:>3}%)  avg {:>+4}  best {:>+4}  worst {:>+4}  ±{}",
            self.name,
            self.total,
            self.wins,
            self.win_rate,
            self.average,
            self.best,
            self.worst,
            self.spread
        )
    }
}

/// Read-only analytics derived from a history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    records: Vec<Record>,
    series: Vec<BTreeMap<PlayerId, Points>>,
}

impl Stats {
    /// Per-player records in seat order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
    pub fn get(&self, player: PlayerId) -> Option<&Record> {
        self.records.iter().find(|r| r.player == player)
    }
    /// Running totals after each history entry, oldest first.
    pub fn series(&self) -> &[BTreeMap<PlayerId, Points>] {
        &self.series
    }
    /// Records ordered by total, highest first. Ties keep seat order.
    pub fn ranking(&self) -> Vec<&Record> {
        let mut ranked = self.records.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.total.cmp(&a.total));
        ranked
    }
}

impl From<(&Registry, &History)> for Stats {
    fn from((registry, history): (&Registry, &History)) -> Self {
        let mut deltas = registry
            .ids()
            .map(|id| (id, Vec::new()))
            .collect::<BTreeMap<PlayerId, Vec<Points>>>();
        let mut running = registry
            .ids()
            .map(|id| (id, 0))
            .collect::<BTreeMap<PlayerId, Points>>();
        let mut series = Vec::with_capacity(history.len());
        for entry in history.entries() {
            for c in entry.changes() {
                deltas.entry(c.player).or_default().push(c.delta);
                let total = running.entry(c.player).or_default();
                *total = total.saturating_add(c.delta);
            }
            series.push(running.clone());
        }
        let records = registry
            .players()
            .iter()
            .map(|p| {
                Record::new(
                    p.id(),
                    p.name().to_string(),
                    deltas.get(&p.id()).map(Vec::as_slice).unwrap_or_default(),
                    history.len(),
                )
            })
            .collect();
        Self { records, series }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (rank, record) in self.ranking().into_iter().enumerate() {
            writeln!(f, "{}. {}", rank + 1, record)?;
        }
        Ok(())
    }
}

/// Half rounds toward positive infinity, so -3.5 becomes -3.
fn round(x: f64) -> Points {
    (x + 0.5).floor() as Points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Session;
    use crate::scoring::Action;

    fn stats() -> Stats {
        let mut session = Session::new(Registry::named(["A", "B", "C", "D"]).unwrap());
        session
            .apply(Action::SelfDrawn {
                winner: 1,
                points: 2,
            })
            .unwrap();
        session
            .apply(Action::Target {
                winner: 2,
                loser: 3,
                points: 4,
            })
            .unwrap();
        session.apply(Action::Extend).unwrap();
        session.stats()
    }

    #[test]
    fn records_follow_the_changes() {
        let stats = stats();
        let a = stats.get(1).unwrap();
        assert_eq!((a.wins, a.rounds, a.total), (1, 1, 9));
        assert_eq!((a.best, a.worst, a.spread), (9, 9, 0));
        assert_eq!(a.win_rate, 33);
        let b = stats.get(2).unwrap();
        assert_eq!((b.wins, b.rounds, b.total), (1, 2, 1));
        assert_eq!(b.average, 1);
        assert_eq!((b.best, b.worst), (4, -3));
        assert_eq!(b.spread, 4);
        let c = stats.get(3).unwrap();
        assert_eq!(c.total, -7);
        assert_eq!(c.average, -3);
        assert_eq!(c.spread, 1);
        assert_eq!(c.win_rate, 0);
    }

    #[test]
    fn ranking_is_by_total() {
        let ranked = stats()
            .ranking()
            .into_iter()
            .map(|r| r.player)
            .collect::<Vec<_>>();
        assert_eq!(ranked, vec![1, 2, 4, 3]);
    }

    #[test]
    fn series_accumulates_per_entry() {
        let stats = stats();
        assert_eq!(stats.series().len(), 3);
        assert_eq!(stats.series()[0][&2], -3);
        assert_eq!(stats.series()[1][&2], 1);
        assert_eq!(stats.series()[2], stats.series()[1]);
        assert!(stats.series().iter().all(|s| s.values().sum::<Points>() == 0));
    }

    #[test]
    fn empty_history_gives_blank_records() {
        let stats = Stats::from((&Registry::default(), &History::default()));
        assert_eq!(stats.records().len(), 4);
        assert!(stats.records().iter().all(|r| r.rounds == 0 && r.total == 0));
        assert!(stats.series().is_empty());
    }
}
