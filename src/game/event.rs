use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::UserId;
use super::role::{Faction, Role};
use super::Phase;

/// Who an [Event] should be delivered to.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Recipient {
    /// The channel the game is being played on.
    Channel,
    /// A private message to a single player.
    Player(UserId),
}

/// An addressed [Event], ready to be handed to a notifier.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct Notice {
    pub recipient: Recipient,
    pub event: Event,
}

impl Notice {
    pub fn channel(event: Event) -> Self {
        Self {
            recipient: Recipient::Channel,
            event,
        }
    }

    pub fn player(id: UserId, event: Event) -> Self {
        Self {
            recipient: Recipient::Player(id),
            event,
        }
    }
}

/// One row of a [Event::Tally] broadcast.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct TallyRow {
    pub name: String,
    pub count: usize,
    /// Names of the players currently voting for this candidate.
    pub voters: Vec<String>,
}

/// Something that happened in the game, announced through the notifier.
///
/// The `Display` impl renders the announcement text; transports that want
/// richer formatting can match on the variants instead.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(tag = "type")]
pub enum Event {
    GameOpened { join_secs: u64 },
    PlayerJoined { name: String },
    JoinsClosed { names: Vec<String> },
    NotEnoughPlayers { joined: usize, needed: usize },
    AssigningRoles,
    RoleReveal { role: Role },
    MafiaAllies { allies: Vec<String> },
    VoteCast { voter: String, target: String, changed: bool },
    NoLynchVote { voter: String },
    Tally { rows: Vec<TallyRow>, no_lynch: usize },
    PhaseBegan { phase: Phase, day: u32 },
    Lynched { name: String },
    Killed { name: String },
    NoLynchResult,
    GameOver { winner: Faction },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::GameOpened { join_secs } => write!(
                f,
                "A Mafia game has started! Players who want to join may type ':>join'. \
                 Joining period will last for {} seconds.",
                join_secs
            ),
            Event::PlayerJoined { name } => write!(f, "{} has joined the game.", name),
            Event::JoinsClosed { names } => write!(
                f,
                "Joining period has ended! The players are:\n{}",
                names.join(", ")
            ),
            Event::NotEnoughPlayers { joined, needed } => write!(
                f,
                "Only {} player(s) joined, but at least {} are needed. The game is cancelled.",
                joined, needed
            ),
            Event::AssigningRoles => write!(f, "Assigning roles to players."),
            Event::RoleReveal { role } => write!(f, "You are a {}.", role),
            Event::MafiaAllies { allies } => write!(f, "Your allies are {}", allies.join(", ")),
            Event::VoteCast {
                voter,
                target,
                changed,
            } => {
                if *changed {
                    write!(f, "{} changed their vote to {}!", voter, target)
                } else {
                    write!(f, "{} voted for {}!", voter, target)
                }
            }
            Event::NoLynchVote { voter } => write!(f, "{} votes no lynch!", voter),
            Event::Tally { rows, no_lynch } => {
                writeln!(f, "The votes currently are:")?;
                for row in rows {
                    writeln!(f, "{}({}) - {}", row.name, row.count, row.voters.join(", "))?;
                }
                write!(f, "No lynch({})", no_lynch)
            }
            Event::PhaseBegan { phase, day } => write!(f, "It is now {} {}.", phase, day),
            Event::Lynched { name } => write!(f, "{} has been lynched!", name),
            Event::Killed { name } => write!(f, "{} has been killed!", name),
            Event::NoLynchResult => write!(f, "The town has voted for no lynch!"),
            Event::GameOver { winner } => match winner {
                Faction::Mafia => write!(f, "The game is over! The Mafia have won!"),
                Faction::Town => write!(f, "The game is over! The Town has won!"),
            },
        }
    }
}
