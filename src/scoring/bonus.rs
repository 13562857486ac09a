use super::*;
use crate::MAX_POINTS;
use crate::PlayerId;
use crate::Points;
use crate::ledger::WinLedger;
use serde::Deserialize;
use serde::Serialize;

/// How a winner's previous standing against a loser feeds into a new hit.
///
/// - `Fresh`: no prior debt either way that counts
/// - `La`: the winner already holds debt `P` against this loser; adds `round(P / 2)`
/// - `Kick`: a new lineage, and the loser held debt `R` against the winner; adds `floor(R / 2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Streak {
    Fresh,
    La(Points),
    Kick(Points),
}

impl Streak {
    /// Extra points this streak adds on top of base and dealer bonus.
    pub fn bonus(&self) -> Points {
        match *self {
            Self::Fresh => 0,
            Self::La(prior) => prior / 2 + prior % 2,
            Self::Kick(reverse) => reverse / 2,
        }
    }
}

/// Breakdown of a single winner-to-loser hit.
///
/// `hit` is what changes hands now; `total` is what the loser owes the
/// winner afterwards. Under `La` the prior debt stays on the books and
/// compounds, so `total = prior + hit`. Otherwise `total = hit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bonus {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub base: Points,
    pub dealer: Points,
    pub streak: Streak,
}

impl Bonus {
    /// Scores `winner` hitting `loser` for `base` against the table as it
    /// stands before the win.
    ///
    /// `broken` says whether anyone outside the winning set currently holds
    /// owed points, i.e. whether this win starts a new lineage. Fails with
    /// [`Error::InvalidValue`] when the new owed total would pass
    /// [`MAX_POINTS`].
    pub fn compute(
        base: Points,
        winner: PlayerId,
        loser: PlayerId,
        dealer: &Dealer,
        owed: &WinLedger,
        broken: bool,
    ) -> Result<Self, Error> {
        let prior = owed.get(winner, loser);
        let reverse = owed.get(loser, winner);
        let streak = if prior > 0 {
            Streak::La(prior)
        } else if broken && reverse > 0 {
            Streak::Kick(reverse)
        } else {
            Streak::Fresh
        };
        let bonus = Self {
            winner,
            loser,
            base,
            dealer: if dealer.involves(winner, loser) {
                dealer.bonus()?
            } else {
                0
            },
            streak,
        };
        let carried = match streak {
            Streak::La(prior) => prior,
            _ => 0,
        };
        [bonus.base, bonus.dealer, bonus.extra(), carried]
            .into_iter()
            .try_fold(0 as Points, Points::checked_add)
            .filter(|&total| total <= MAX_POINTS)
            .map(|_| bonus)
            .ok_or(Error::InvalidValue(base))
    }
    /// La or kick bonus.
    pub fn extra(&self) -> Points {
        self.streak.bonus()
    }
    /// Points that move from loser to winner now.
    pub fn hit(&self) -> Points {
        self.base
            .saturating_add(self.dealer)
            .saturating_add(self.extra())
    }
    /// Owed points for the pair after this hit.
    pub fn total(&self) -> Points {
        match self.streak {
            Streak::La(prior) => prior.saturating_add(self.hit()),
            _ => self.hit(),
        }
    }
}

impl std::fmt::Display for Bonus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let tag = match self.streak {
            Streak::Fresh => "  ",
            Streak::La(_) => "la",
            Streak::Kick(_) => "kick",
        };
        write!(
            f,
            "P{} <- P{}  base {:>3}  dealer {:>3}  {} {:>3}  = {:>4}  (owed {})",
            self.winner,
            self.loser,
            self.base,
            self.dealer,
            tag,
            self.extra(),
            self.hit(),
            self.total(),
        )
    }
}
