use super::*;
use crate::PlayerId;
use crate::SEATS;
use crate::scoring::Error;
use serde::Deserialize;
use serde::Serialize;

/// The ordered players at the table.
///
/// Seat order is list order. The first seat deals when a session starts.
/// Players are never removed mid-session, so an id that resolves once
/// resolves for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry(Vec<Player>);

impl Default for Registry {
    fn default() -> Self {
        Self((1..=SEATS as PlayerId).map(Player::from).collect())
    }
}

impl Registry {
    /// Seats the named players in order, numbering ids from 1.
    pub fn named<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .zip(1..)
            .map(|(name, id)| Player::new(id, name))
            .collect::<Vec<_>>()
            .try_into()
    }
    pub fn players(&self) -> &[Player] {
        &self.0
    }
    /// Ids in seat order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.0.iter().map(Player::id)
    }
    pub fn contains(&self, id: PlayerId) -> bool {
        self.0.iter().any(|p| p.id() == id)
    }
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.0.iter().find(|p| p.id() == id)
    }
    /// Fails with [`Error::InvalidPlayer`] for unknown ids.
    pub fn check(&self, id: PlayerId) -> Result<PlayerId, Error> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(Error::InvalidPlayer(id))
        }
    }
    /// Display name, falling back to the raw id for unknown players.
    pub fn name(&self, id: PlayerId) -> String {
        self.get(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| format!("#{}", id))
    }
    /// Everyone except `id`, in seat order.
    pub fn opponents(&self, id: PlayerId) -> Vec<PlayerId> {
        self.ids().filter(|&other| other != id).collect()
    }
    /// The first seat.
    pub fn first(&self) -> PlayerId {
        self.0.first().map(Player::id).unwrap_or_default()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Player>> for Registry {
    type Error = Error;
    fn try_from(players: Vec<Player>) -> Result<Self, Self::Error> {
        if players.len() != SEATS {
            return Err(Error::InvalidValue(players.len() as crate::Points));
        }
        for (i, player) in players.iter().enumerate() {
            if players[..i].iter().any(|p| p.id() == player.id()) {
                return Err(Error::InvalidPlayer(player.id()));
            }
        }
        Ok(Self(players))
    }
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let names = self.0.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        write!(f, "{}", names.join(" / "))
    }
}
