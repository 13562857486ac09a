use super::*;
use crate::MAX_POINTS;
use crate::MULTI_MAX;
use crate::MULTI_MIN;
use crate::PlayerId;
use crate::Points;
use crate::SURRENDER_THRESHOLD;
use crate::ledger::*;
use crate::players::Registry;
use crate::scoring::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// The memoryless scoring state of a table between actions.
///
/// `Table` holds everything the bonus rules read: the players, the owed
/// points and la-counters of the active lineage, who leads that lineage,
/// and who deals. It carries no history of how it got here.
///
/// Transitions are functional: [`apply`](Self::apply) validates an action
/// and returns the next table alongside the score changes, leaving `self`
/// untouched. Rejection is therefore atomic for free.
///
/// # Fields
///
/// - `players`: seat order and names
/// - `owed`: points each loser owes each winner of the active lineage
/// - `la`: consecutive hits per `(winner, loser)` while the streak lasts
/// - `winner`: leader of the active lineage, `None` before the first win
/// - `dealer`: dealer seat and run length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    players: Registry,
    owed: WinLedger,
    la: LaCounts,
    winner: Option<PlayerId>,
    dealer: Dealer,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

/// Construction and validation.
impl Table {
    /// Fresh table: nothing owed, first seat deals.
    pub fn new(players: Registry) -> Self {
        Self {
            dealer: Dealer::new(players.first()),
            players,
            owed: WinLedger::default(),
            la: LaCounts::default(),
            winner: None,
        }
    }
    /// Checks a table that came from outside (e.g. a saved blob) and
    /// restores the sparse form of its matrices.
    pub fn validated(self) -> Result<Self, Error> {
        Registry::try_from(self.players.players().to_vec())?;
        let known = |id: PlayerId| self.players.check(id);
        for (winner, loser, value) in self.owed.entries().chain(self.la.entries()) {
            known(winner)?;
            known(loser)?;
            if !(0..=MAX_POINTS).contains(&value) {
                return Err(Error::InvalidValue(value));
            }
        }
        known(self.dealer.id())?;
        if self.dealer.consecutive() < 1 {
            return Err(Error::InvalidValue(self.dealer.consecutive()));
        }
        if let Some(winner) = self.winner {
            known(winner)?;
        }
        Ok(Self {
            owed: self.owed.entries().collect(),
            la: self.la.entries().collect(),
            ..self
        })
    }
}

/// Read access.
impl Table {
    pub fn players(&self) -> &Registry {
        &self.players
    }
    pub fn owed(&self) -> &WinLedger {
        &self.owed
    }
    pub fn la(&self) -> &LaCounts {
        &self.la
    }
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }
    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }
    /// Rows a win by `winners` would clear. Lets the caller confirm
    /// before committing; the transition itself never asks.
    pub fn would_reset(&self, winners: &[PlayerId]) -> Vec<Lineage> {
        other_lineages(&self.owed, winners)
    }
    /// True once the current winner has hit `loser` often enough that the
    /// loser may surrender the pair. Advisory: surrender itself does not
    /// check the threshold.
    pub fn surrenderable(&self, loser: PlayerId) -> bool {
        self.winner.is_some_and(|winner| {
            self.owed.get(winner, loser) > 0 && self.la.get(winner, loser) >= SURRENDER_THRESHOLD
        })
    }
    /// Runs an action without committing it, for showing a breakdown first.
    pub fn preview(&self, action: &Action) -> Result<Outcome, Error> {
        self.apply(action)
    }
}

/// Transitions.
impl Table {
    /// Validates `action` and computes the next table.
    pub fn apply(&self, action: &Action) -> Result<Outcome, Error> {
        match action {
            Action::Target {
                winner,
                loser,
                points,
            } => self.target(*winner, *loser, *points),
            Action::SelfDrawn { winner, points } => self.self_drawn(*winner, *points),
            Action::Multi { loser, winners } => self.multi(*loser, winners),
            Action::Collect { player, amount } => self.spread(*player, positive(*amount)?),
            Action::Pay { player, amount } => self.spread(*player, -positive(*amount)?),
            Action::Explode { player, payouts } => self.explode(*player, payouts),
            Action::Surrender { loser } => self.surrender(*loser),
            Action::Transfer { dealer } => self.transfer(*dealer),
            Action::Extend => self.extend(),
        }
    }

    fn target(&self, winner: PlayerId, loser: PlayerId, points: Points) -> Result<Outcome, Error> {
        let winner = self.players.check(winner)?;
        let loser = self.players.check(loser)?;
        let points = positive(points)?;
        if winner == loser {
            return Err(Error::InvalidPlayer(loser));
        }
        let broken = self.is_broken(&[winner]);
        let bonus = Bonus::compute(points, winner, loser, &self.dealer, &self.owed, broken)?;
        log::debug!("[table] {}", bonus);
        let mut next = self.clone();
        next.succeed(&[winner], broken);
        next.record(&bonus);
        Ok(Outcome {
            table: next,
            changes: vec![
                ScoreChange::new(winner, bonus.hit()),
                ScoreChange::new(loser, -bonus.hit()),
            ],
            bonuses: vec![bonus],
        })
    }

    fn self_drawn(&self, winner: PlayerId, points: Points) -> Result<Outcome, Error> {
        let winner = self.players.check(winner)?;
        let points = positive(points)?;
        let broken = self.is_broken(&[winner]);
        let bonuses = self
            .players
            .opponents(winner)
            .into_iter()
            .map(|loser| Bonus::compute(points, winner, loser, &self.dealer, &self.owed, broken))
            .inspect(|bonus| bonus.iter().for_each(|b| log::debug!("[table] {}", b)))
            .collect::<Result<Vec<_>, _>>()?;
        let mut next = self.clone();
        next.succeed(&[winner], broken);
        bonuses.iter().for_each(|bonus| next.record(bonus));
        let gained = bonuses.iter().map(Bonus::hit).sum::<Points>();
        let changes = std::iter::once(ScoreChange::new(winner, gained))
            .chain(bonuses.iter().map(|b| ScoreChange::new(b.loser, -b.hit())))
            .collect();
        Ok(Outcome {
            table: next,
            changes,
            bonuses,
        })
    }

    /// Every winner is scored against the table as it stood before the
    /// discard, so the order winners are listed in only picks the leader.
    /// The loser's own lineage does not make the win a break.
    fn multi(&self, loser: PlayerId, winners: &[(PlayerId, Points)]) -> Result<Outcome, Error> {
        if !(MULTI_MIN..=MULTI_MAX).contains(&winners.len()) {
            return Err(Error::InvalidWinnerCount(winners.len()));
        }
        let loser = self.players.check(loser)?;
        let mut ids = Vec::with_capacity(winners.len());
        for &(winner, points) in winners {
            let winner = self.players.check(winner)?;
            if winner == loser || ids.contains(&winner) {
                return Err(Error::InvalidPlayer(winner));
            }
            positive(points)?;
            ids.push(winner);
        }
        let broken = self.is_broken(&[ids.as_slice(), &[loser]].concat());
        let bonuses = winners
            .iter()
            .map(|&(winner, points)| {
                Bonus::compute(points, winner, loser, &self.dealer, &self.owed, broken)
            })
            .inspect(|bonus| bonus.iter().for_each(|b| log::debug!("[table] {}", b)))
            .collect::<Result<Vec<_>, _>>()?;
        let mut next = self.clone();
        next.succeed(&ids, broken);
        bonuses.iter().for_each(|bonus| next.record(bonus));
        let lost = bonuses.iter().map(Bonus::hit).sum::<Points>();
        let changes = bonuses
            .iter()
            .map(|b| ScoreChange::new(b.winner, b.hit()))
            .chain(std::iter::once(ScoreChange::new(loser, -lost)))
            .collect();
        Ok(Outcome {
            table: next,
            changes,
            bonuses,
        })
    }

    /// Collect (positive `amount`) or pay (negative) the same amount with
    /// every opponent. Ledger, counters and dealer are untouched.
    fn spread(&self, player: PlayerId, amount: Points) -> Result<Outcome, Error> {
        let player = self.players.check(player)?;
        let opponents = self.players.opponents(player);
        let changes = std::iter::once(ScoreChange::new(
            player,
            amount * opponents.len() as Points,
        ))
        .chain(opponents.into_iter().map(|o| ScoreChange::new(o, -amount)))
        .collect();
        Ok(self.settlement(changes))
    }

    fn explode(
        &self,
        player: PlayerId,
        payouts: &BTreeMap<PlayerId, Points>,
    ) -> Result<Outcome, Error> {
        let player = self.players.check(player)?;
        if payouts.is_empty() {
            return Err(Error::InvalidValue(0));
        }
        for (&opponent, &amount) in payouts {
            if self.players.check(opponent)? == player {
                return Err(Error::InvalidPlayer(opponent));
            }
            positive(amount)?;
        }
        let owed = payouts.values().sum::<Points>();
        let changes = std::iter::once(ScoreChange::new(player, -owed))
            .chain(payouts.iter().map(|(&o, &p)| ScoreChange::new(o, p)))
            .collect();
        Ok(self.settlement(changes))
    }

    fn surrender(&self, loser: PlayerId) -> Result<Outcome, Error> {
        let loser = self.players.check(loser)?;
        let winner = self
            .winner
            .filter(|&winner| self.owed.get(winner, loser) > 0)
            .ok_or(Error::NoOpSurrender { loser })?;
        log::debug!(
            "[table] P{} surrenders {} owed to P{} after {} hits",
            loser,
            self.owed.get(winner, loser),
            winner,
            self.la.get(winner, loser)
        );
        let mut next = self.clone();
        next.owed.set(winner, loser, 0);
        next.la.set(winner, loser, 0);
        Ok(Outcome {
            table: next,
            changes: Vec::new(),
            bonuses: Vec::new(),
        })
    }

    fn transfer(&self, dealer: PlayerId) -> Result<Outcome, Error> {
        let dealer = self.players.check(dealer)?;
        let mut next = self.clone();
        next.dealer.transfer(dealer);
        Ok(next.unscored())
    }

    fn extend(&self) -> Result<Outcome, Error> {
        let mut next = self.clone();
        next.dealer.extend();
        Ok(next.unscored())
    }
}

/// Lineage bookkeeping.
impl Table {
    /// True if anyone outside `exempt` currently holds owed points.
    fn is_broken(&self, exempt: &[PlayerId]) -> bool {
        self.owed.winners().any(|w| !exempt.contains(&w))
    }
    /// Hands the lineage to `winners`, led by the first.
    ///
    /// Unless the leader simply continues an unbroken streak, every other
    /// lineage is cleared. Winners keep their own rows: an la-counter
    /// lives exactly as long as the owed entry it counts.
    fn succeed(&mut self, winners: &[PlayerId], broken: bool) {
        let lead = winners[0];
        if broken || self.winner != Some(lead) {
            reset_other_lineages(&mut self.owed, &mut self.la, winners);
        }
        self.winner = Some(lead);
        self.dealer.advance(lead);
    }
    /// Writes a scored hit into the ledger and counters.
    fn record(&mut self, bonus: &Bonus) {
        self.owed.set(bonus.winner, bonus.loser, bonus.total());
        self.la.bump(bonus.winner, bonus.loser);
    }
    /// Point-only outcome against an unchanged table.
    fn settlement(&self, changes: Vec<ScoreChange>) -> Outcome {
        Outcome {
            table: self.clone(),
            changes,
            bonuses: Vec::new(),
        }
    }
    fn unscored(self) -> Outcome {
        Outcome {
            table: self,
            changes: Vec::new(),
            bonuses: Vec::new(),
        }
    }
}

/// Reported values must lie in `1..=MAX_POINTS`.
fn positive(points: Points) -> Result<Points, Error> {
    if (1..=MAX_POINTS).contains(&points) {
        Ok(points)
    } else {
        Err(Error::InvalidValue(points))
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.dealer)?;
        for player in self.players.players() {
            let id = player.id();
            let lead = if self.winner == Some(id) { "*" } else { " " };
            let deal = if self.dealer.is(id) { "D" } else { " " };
            let owed = self
                .owed
                .row(id)
                .map(|(loser, points)| format!("P{}:{}x{}", loser, points, self.la.get(id, loser)))
                .collect::<Vec<_>>();
            writeln!(f, "{}{} P{} {:<12} {}", lead, deal, id, player.name(), owed.join(" "))?;
        }
        Ok(())
    }
}
