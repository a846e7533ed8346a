use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for customising a game of Mafia.
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct GameOptions {
    /// How long the joining period stays open.
    pub join_timeout: Duration,
    /// The smallest roster a game will start with.
    pub min_players: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            join_timeout: Duration::from_secs(10),
            min_players: 3,
        }
    }
}
