use crate::Arbitrary;
use crate::PlayerId;
use crate::Points;
use crate::SEATS;
use crate::players::Registry;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// A mutating request against the table.
///
/// Win variants move the lineage and the dealer seat. Settlements only move
/// points. Surrender only clears a pair. Dealer variants only touch the seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// `winner` wins off a discard by `loser`.
    Target {
        winner: PlayerId,
        loser: PlayerId,
        points: Points,
    },
    /// `winner` draws its own winning tile; every opponent pays.
    SelfDrawn { winner: PlayerId, points: Points },
    /// One discard by `loser` pays two or three winners, first listed leads.
    Multi {
        loser: PlayerId,
        winners: Vec<(PlayerId, Points)>,
    },
    /// `player` collects `amount` from every opponent.
    Collect { player: PlayerId, amount: Points },
    /// `player` pays `amount` to every opponent.
    Pay { player: PlayerId, amount: Points },
    /// `player` pays each listed opponent its own amount.
    Explode {
        player: PlayerId,
        payouts: BTreeMap<PlayerId, Points>,
    },
    /// `loser` walks away from its debt to the current winner.
    Surrender { loser: PlayerId },
    /// Dealer seat moves to `dealer` by hand.
    Transfer { dealer: PlayerId },
    /// Dealer run extends by hand.
    Extend,
}

impl Action {
    /// True for the variants that resolve a winning hand.
    pub fn is_win(&self) -> bool {
        matches!(
            self,
            Self::Target { .. } | Self::SelfDrawn { .. } | Self::Multi { .. }
        )
    }
    /// Human-readable line for the history log.
    pub fn describe(&self, registry: &Registry) -> String {
        let name = |id: PlayerId| registry.name(id);
        match self {
            Self::Target {
                winner,
                loser,
                points,
            } => format!("{} wins {} off {}", name(*winner), points, name(*loser)),
            Self::SelfDrawn { winner, points } => {
                format!("{} self-draws {}", name(*winner), points)
            }
            Self::Multi { loser, winners } => format!(
                "{} pays {}",
                name(*loser),
                winners
                    .iter()
                    .map(|(w, p)| format!("{} {}", name(*w), p))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Collect { player, amount } => {
                format!("{} collects {} from everyone", name(*player), amount)
            }
            Self::Pay { player, amount } => {
                format!("{} pays {} to everyone", name(*player), amount)
            }
            Self::Explode { player, payouts } => format!(
                "{} explodes: {}",
                name(*player),
                payouts
                    .iter()
                    .map(|(o, p)| format!("{} {}", name(*o), p))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Surrender { loser } => format!("{} surrenders", name(*loser)),
            Self::Transfer { dealer } => format!("{} takes the deal", name(*dealer)),
            Self::Extend => "dealer extends".to_string(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.describe(&Registry::default()))
    }
}

/// Random action over the default seats `1..=SEATS`. May be one the table
/// rejects (surrendering nothing, say), which is useful in itself.
impl Arbitrary for Action {
    fn random() -> Self {
        use rand::seq::SliceRandom;
        let ref mut rng = rand::rng();
        let mut seats = (1..=SEATS as PlayerId).collect::<Vec<_>>();
        seats.shuffle(rng);
        let points = || rand::random_range(1..=8);
        match rand::random_range(0..16) {
            0..=5 => Self::Target {
                winner: seats[0],
                loser: seats[1],
                points: points(),
            },
            6..=8 => Self::SelfDrawn {
                winner: seats[0],
                points: points(),
            },
            9..=10 => Self::Multi {
                loser: seats[0],
                winners: seats[1..rand::random_range(3..=SEATS)]
                    .iter()
                    .map(|&w| (w, points()))
                    .collect(),
            },
            11 => Self::Collect {
                player: seats[0],
                amount: points(),
            },
            12 => Self::Pay {
                player: seats[0],
                amount: points(),
            },
            13 => Self::Explode {
                player: seats[0],
                payouts: seats[1..].iter().map(|&o| (o, points())).collect(),
            },
            14 => Self::Surrender { loser: seats[0] },
            _ => match rand::random_range(0..2) {
                0 => Self::Transfer { dealer: seats[0] },
                _ => Self::Extend,
            },
        }
    }
}
