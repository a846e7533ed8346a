use serde::{Deserialize, Serialize};
use std::fmt;

use super::role::Role;

/// An opaque identity handle assigned by the chat collaborator.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game player.
///
/// Eliminated players stay in the roster with `alive` set to `false`;
/// they can no longer vote or be voted for.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Player {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
    /// Index of the player this player is currently voting for.
    pub votes_for: Option<usize>,
    pub no_lynch: bool,
}

impl Player {
    pub fn new(id: UserId, name: String, role: Role) -> Self {
        Self {
            id,
            name,
            role,
            alive: true,
            votes_for: None,
            no_lynch: false,
        }
    }
}

/// Deals out roles for a roster of the given size.
///
/// One quarter of the roster, rounded, is drawn uniformly without
/// replacement as mafia; everyone else is a townie.
pub fn assign_roles(num_players: usize, rng: &mut impl rand::Rng) -> Vec<Role> {
    let num_mafia = (num_players as f64 / 4.0).round() as usize;
    let mut mafia = Vec::with_capacity(num_mafia);
    while mafia.len() < num_mafia {
        let index = rng.gen_range(0..num_players);
        if !mafia.contains(&index) {
            mafia.push(index);
        }
    }
    (0..num_players)
        .map(|index| {
            if mafia.contains(&index) {
                Role::Mafia
            } else {
                Role::Town
            }
        })
        .collect()
}
