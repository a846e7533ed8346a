pub use self::event::{Event, Notice, Recipient, TallyRow};
pub use self::options::GameOptions;
pub use self::player::{Player, UserId};
pub use self::role::{Faction, Role};
pub use self::tally::VoteTally;
use crate::error::GameError;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

mod event;
mod options;
mod player;
mod role;
mod tally;
mod test;

/// A game of Mafia.
///
/// The game is a pure state machine: every mutation returns the [Notice]s
/// describing what happened, and delivering them is the caller's concern.
/// Callers must serialize mutations (the session layer holds each game
/// behind a mutex) so that each tally broadcast reflects exactly the state
/// after the vote that produced it.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Game {
    players: Vec<Player>,
    phase: Phase,
    day: u32,
    tally: VoteTally,
    outcome: Option<Faction>,
}

/// The Day/Night segment of a game day.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Phase {
    Night,
    Day,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Night => "Night",
            Phase::Day => "Day",
        })
    }
}

impl Game {
    /// Creates a new game of Mafia from the joined roster, assigning roles.
    ///
    /// Roughly a quarter of the roster becomes mafia, drawn uniformly at
    /// random from the given seed. The game begins in the initial night;
    /// call [Game::begin] to reveal roles and open the first day.
    pub fn new(
        roster: &[(UserId, String)],
        opts: &GameOptions,
        seed: u64,
    ) -> Result<Self, GameError> {
        if roster.len() < opts.min_players {
            return Err(GameError::TooFewPlayers);
        }
        for (i, (id, _)) in roster.iter().enumerate() {
            if roster[..i].iter().any(|(other, _)| other == id) {
                return Err(GameError::PlayerAlreadyJoined);
            }
        }

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let roles = player::assign_roles(roster.len(), &mut rng);
        let players = roster
            .iter()
            .zip(roles)
            .map(|((id, name), role)| Player::new(*id, name.clone(), role))
            .collect::<Vec<_>>();

        let mut game = Game {
            players,
            phase: Phase::Night,
            day: 0,
            tally: VoteTally::default(),
            outcome: None,
        };
        game.rebuild_tally();
        Ok(game)
    }

    /// Reveals each player's role to them, introduces the mafia to their
    /// allies, and opens the first day. Call exactly once, after [Game::new].
    pub fn begin(&mut self) -> Vec<Notice> {
        let mut notices = vec![Notice::channel(Event::AssigningRoles)];

        for player in &self.players {
            notices.push(Notice::player(
                player.id,
                Event::RoleReveal { role: player.role },
            ));
        }

        let mafia = self.faction_members(Faction::Mafia);
        if mafia.len() > 1 {
            for &idx in &mafia {
                let allies = mafia
                    .iter()
                    .filter(|other| **other != idx)
                    .map(|other| self.players[*other].name.clone())
                    .collect();
                notices.push(Notice::player(
                    self.players[idx].id,
                    Event::MafiaAllies { allies },
                ));
            }
        }

        notices.extend(self.progress_phase());
        notices
    }

    /// Called when a player votes to lynch (by day) or kill (by night) another player.
    ///
    /// At night only living mafia may vote; the candidate set is always the
    /// living roster. Returns the notices to deliver, ending with the phase
    /// transition if the vote produced a decisive majority.
    pub fn cast_vote(
        &mut self,
        voter: UserId,
        target: Option<UserId>,
    ) -> Result<Vec<Notice>, GameError> {
        let voter = self.check_voter(voter)?;

        let target = target.ok_or(GameError::NoTargetSpecified)?;
        let target = self
            .find_player(target)
            .map_err(|_| GameError::TargetNotInGame)?;
        if !self.players[target].alive {
            return Err(GameError::TargetDead);
        }

        let changed = self.players[voter].votes_for.is_some();
        if self.players[voter].no_lynch {
            self.players[voter].no_lynch = false;
            self.tally.retract_no_lynch();
        }
        if let Some(previous) = self.players[voter].votes_for {
            self.tally.retract_vote(previous);
        }
        self.tally.cast_vote(target);
        self.players[voter].votes_for = Some(target);

        let mut notices = self.broadcast(Event::VoteCast {
            voter: self.players[voter].name.clone(),
            target: self.players[target].name.clone(),
            changed,
        });
        notices.extend(self.broadcast(self.tally_snapshot()));
        notices.extend(self.resolve_majority(Some(target)));
        Ok(notices)
    }

    /// Called when a player votes for nobody to be eliminated this phase.
    pub fn vote_no_lynch(&mut self, voter: UserId) -> Result<Vec<Notice>, GameError> {
        let voter = self.check_voter(voter)?;

        if self.players[voter].no_lynch {
            return Err(GameError::AlreadyNoLynch);
        }
        if let Some(previous) = self.players[voter].votes_for.take() {
            self.tally.retract_vote(previous);
        }
        self.players[voter].no_lynch = true;
        self.tally.cast_no_lynch();

        let mut notices = self.broadcast(Event::NoLynchVote {
            voter: self.players[voter].name.clone(),
        });
        notices.extend(self.broadcast(self.tally_snapshot()));
        notices.extend(self.resolve_majority(None));
        Ok(notices)
    }

    /// Finds the player with the given identity.
    pub fn find_player(&self, id: UserId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::NotInGame)
    }

    /// Gets the full roster, eliminated players included.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Gets the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gets the current day number; day 1 is the first day.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Gets the active vote tally.
    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    /// Gets the winning faction, if the game is over.
    pub fn outcome(&self) -> Option<Faction> {
        self.outcome
    }

    /// Gets the number of players that are alive.
    pub fn num_alive(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Gets the number of living players belonging to the given faction.
    pub fn num_alive_in(&self, faction: Faction) -> usize {
        self.players
            .iter()
            .filter(|p| p.alive && p.role.faction() == faction)
            .count()
    }

    /// Validates that `voter` may cast a vote right now, returning their index.
    fn check_voter(&self, voter: UserId) -> Result<usize, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameNotInProgress);
        }
        let voter = self.find_player(voter)?;
        if !self.players[voter].alive {
            return Err(GameError::VoterDead);
        }
        if self.phase == Phase::Night && self.players[voter].role != Role::Mafia {
            return Err(GameError::NotMafia);
        }
        Ok(voter)
    }

    /// Checks whether the last vote was decisive, in order: a majority
    /// against the voted player first, then a no-lynch majority. At most
    /// one can fire per vote.
    fn resolve_majority(&mut self, voted: Option<usize>) -> Vec<Notice> {
        let mut notices = vec![];

        if let Some(target) = voted.filter(|t| self.tally.has_lynch_majority(*t)) {
            let name = self.players[target].name.clone();
            notices.push(Notice::channel(match self.phase {
                Phase::Day => Event::Lynched { name },
                Phase::Night => Event::Killed { name },
            }));
            self.eliminate(target);
            if let Some(winner) = self.check_win() {
                self.outcome = Some(winner);
                notices.push(Notice::channel(Event::GameOver { winner }));
                return notices;
            }
            notices.extend(self.progress_phase());
        } else if self.tally.has_no_lynch_majority() {
            notices.push(Notice::channel(Event::NoLynchResult));
            notices.extend(self.progress_phase());
        }

        notices
    }

    /// Flips the phase, resetting every player's vote and rebuilding the
    /// tally over the living roster. The day number increments when night
    /// turns to day.
    fn progress_phase(&mut self) -> Vec<Notice> {
        self.phase = match self.phase {
            Phase::Day => Phase::Night,
            Phase::Night => {
                self.day += 1;
                Phase::Day
            }
        };
        for player in &mut self.players {
            player.votes_for = None;
            player.no_lynch = false;
        }
        self.rebuild_tally();
        vec![Notice::channel(Event::PhaseBegan {
            phase: self.phase,
            day: self.day,
        })]
    }

    /// Marks a player as eliminated; the record stays in the roster.
    fn eliminate(&mut self, target: usize) {
        self.players[target].alive = false;
    }

    /// Returns the faction that has won, if any.
    fn check_win(&self) -> Option<Faction> {
        [Faction::Mafia, Faction::Town]
            .into_iter()
            .find(|faction| faction.win_condition(self))
    }

    /// Builds a fresh tally over the living roster, with eligible voters
    /// determined by the current phase.
    fn rebuild_tally(&mut self) {
        let targets = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        let num_voters = match self.phase {
            Phase::Day => targets.len(),
            Phase::Night => self.num_alive_in(Faction::Mafia),
        };
        self.tally = VoteTally::new(targets, num_voters);
    }

    /// Renders the current tally for broadcasting.
    fn tally_snapshot(&self) -> Event {
        let rows = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .map(|(idx, p)| TallyRow {
                name: p.name.clone(),
                count: self.tally.count(idx),
                voters: self
                    .players
                    .iter()
                    .filter(|voter| voter.votes_for == Some(idx))
                    .map(|voter| voter.name.clone())
                    .collect(),
            })
            .collect();
        Event::Tally {
            rows,
            no_lynch: self.tally.no_lynch(),
        }
    }

    /// Addresses an event to everyone entitled to see votes this phase:
    /// the whole channel by day, each living mafioso privately by night.
    fn broadcast(&self, event: Event) -> Vec<Notice> {
        match self.phase {
            Phase::Day => vec![Notice::channel(event)],
            Phase::Night => self
                .faction_members(Faction::Mafia)
                .into_iter()
                .map(|idx| Notice::player(self.players[idx].id, event.clone()))
                .collect(),
        }
    }

    /// Gets the indices of the living members of a faction.
    fn faction_members(&self, faction: Faction) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive && p.role.faction() == faction)
            .map(|(idx, _)| idx)
            .collect()
    }
}
