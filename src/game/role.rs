use serde::{Deserialize, Serialize};
use std::fmt;

use super::Game;

/// A player's hidden role.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Role {
    Mafia,
    Town,
}

impl Role {
    /// Gets the faction this role belongs to.
    pub fn faction(self) -> Faction {
        match self {
            Role::Mafia => Faction::Mafia,
            Role::Town => Faction::Town,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Mafia => "Mafia",
            Role::Town => "Townie",
        })
    }
}

/// An allegiance grouping; determines win conditions and, at night, voting eligibility.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Faction {
    Mafia,
    Town,
}

impl Faction {
    /// Evaluates whether this faction has achieved victory given the current game state.
    ///
    /// The mafia win once no townsfolk remain alive; the town wins once no
    /// mafiosi remain alive. No side effects.
    pub fn win_condition(self, game: &Game) -> bool {
        match self {
            Faction::Mafia => game.num_alive_in(Faction::Town) == 0,
            Faction::Town => game.num_alive_in(Faction::Mafia) == 0,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Faction::Mafia => "Mafia",
            Faction::Town => "Town",
        })
    }
}
