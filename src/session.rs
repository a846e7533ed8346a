use crate::error::GameError;
use crate::game::{Event, Game, GameOptions, Notice, Recipient, UserId};
use crate::notifier::{ChannelId, Notifier};
use dashmap::{mapref::entry::Entry, DashMap};
use rand::RngCore;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Manages the game sessions running across all channels, one per channel.
pub struct SessionManager {
    sessions: DashMap<ChannelId, SessionHandle>,
    notifier: Arc<dyn Notifier>,
}

/// A single game session: the lifecycle of one game on one channel.
///
/// All mutation happens under the session's mutex, which serializes the
/// inbound event handlers and the join-window timer against each other.
pub struct Session {
    channel: ChannelId,
    opts: GameOptions,
    state: Lifecycle,
    notifier: Arc<dyn Notifier>,
    /// Cancels the join-window timer; present only while accepting.
    join_timer: Option<watch::Sender<bool>>,
}

pub type SessionHandle = Arc<Mutex<Session>>;

enum Lifecycle {
    /// The joining period is open.
    Accepting { players: Vec<(UserId, String)> },
    /// Roles are assigned and phases are advancing.
    Playing { game: Game },
    /// Terminal. A fresh session is required to play again.
    Ended,
}

impl SessionManager {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sessions: DashMap::new(),
            notifier,
        }
    }

    /// Opens the joining period for a new game on the given channel,
    /// pre-joining any mentioned users, and starts the join-window timer.
    ///
    /// Fails with `GameAlreadyOngoing` if a game on this channel is still
    /// accepting players or in progress. Must be called from within a tokio
    /// runtime, which the join-window timer is spawned onto.
    pub fn open_game(
        &self,
        channel: ChannelId,
        opts: GameOptions,
        mentions: &[(UserId, String)],
    ) -> Result<SessionHandle, GameError> {
        let entry = self.sessions.entry(channel);
        if let Entry::Occupied(occupied) = &entry {
            let ongoing = occupied.get().lock().map(|s| !s.is_over()).unwrap_or(false);
            if ongoing {
                return Err(GameError::GameAlreadyOngoing);
            }
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut session = Session {
            channel,
            opts,
            state: Lifecycle::Accepting { players: vec![] },
            notifier: self.notifier.clone(),
            join_timer: Some(cancel_tx),
        };
        session.deliver(&[Notice::channel(Event::GameOpened {
            join_secs: opts.join_timeout.as_secs(),
        })]);
        for (id, name) in mentions {
            session.add_player(*id, name).ok();
        }

        let handle = Arc::new(Mutex::new(session));
        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(handle.clone());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(handle.clone());
            }
        }

        log::info!("Opened a game on channel {}", channel);
        tokio::spawn(run_join_timer(handle.clone(), opts, cancel_rx));
        Ok(handle)
    }

    /// Finds the session running on the given channel.
    pub fn find_game(&self, channel: ChannelId) -> Result<SessionHandle, GameError> {
        self.sessions
            .get(&channel)
            .map(|session| session.clone())
            .ok_or(GameError::GameNotFound)
    }

    /// Ends the game on the given channel and forgets the session.
    pub fn end_game(&self, channel: ChannelId) -> Result<(), GameError> {
        let session = self.find_game(channel)?;
        let result = match session.lock() {
            Ok(mut session) => session.end_game(),
            Err(_) => {
                log::error!("Found poisoned session: {}", channel);
                Ok(())
            }
        };
        self.sessions.remove(&channel);
        result
    }

    pub fn num_games(&self) -> usize {
        self.sessions.len()
    }
}

/// Waits out the joining period, then closes joins, unless cancelled by an
/// explicit early close first.
async fn run_join_timer(
    handle: SessionHandle,
    opts: GameOptions,
    mut cancel: watch::Receiver<bool>,
) {
    tokio::select! {
        _ = tokio::time::sleep(opts.join_timeout) => {
            let Ok(mut session) = handle.lock() else {
                log::error!("Could not close joins: poisoned session");
                return;
            };
            session.close_joins().ok();
        }
        _ = cancel.changed() => {}
    }
}

impl Session {
    /// Gets the channel this session is playing on.
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Returns whether this session has reached its terminal state.
    pub fn is_over(&self) -> bool {
        matches!(self.state, Lifecycle::Ended)
    }

    /// Gets the running game, if one is in progress.
    pub fn game(&self) -> Option<&Game> {
        match &self.state {
            Lifecycle::Playing { game } => Some(game),
            _ => None,
        }
    }

    /// Adds a player to the game, only while the joining period is open.
    pub fn add_player(&mut self, id: UserId, name: &str) -> Result<(), GameError> {
        let Lifecycle::Accepting { players } = &mut self.state else {
            return Err(match self.state {
                Lifecycle::Playing { .. } => GameError::CannotJoinStartedGame,
                _ => GameError::GameNotInProgress,
            });
        };
        if players.iter().any(|(joined, _)| *joined == id) {
            return Err(GameError::PlayerAlreadyJoined);
        }
        players.push((id, name.to_string()));
        self.deliver(&[Notice::channel(Event::PlayerJoined {
            name: name.to_string(),
        })]);
        Ok(())
    }

    /// Closes the joining period and starts the game, or cancels it if too
    /// few players joined. Called by the join-window timer on expiry, or
    /// directly for an early close (which cancels the timer).
    pub fn close_joins(&mut self) -> Result<(), GameError> {
        let Lifecycle::Accepting { players } = &mut self.state else {
            return Err(GameError::GameNotInProgress);
        };
        let roster = std::mem::take(players);
        self.cancel_timer();

        self.deliver(&[Notice::channel(Event::JoinsClosed {
            names: roster.iter().map(|(_, name)| name.clone()).collect(),
        })]);

        if roster.len() < self.opts.min_players {
            self.deliver(&[Notice::channel(Event::NotEnoughPlayers {
                joined: roster.len(),
                needed: self.opts.min_players,
            })]);
            self.state = Lifecycle::Ended;
            log::info!("Cancelled game on channel {}: too few players", self.channel);
            return Ok(());
        }

        let seed = rand::thread_rng().next_u64();
        let mut game = Game::new(&roster, &self.opts, seed)?;
        let notices = game.begin();
        self.state = Lifecycle::Playing { game };
        self.deliver(&notices);
        log::info!(
            "Started game on channel {} with {} players",
            self.channel,
            roster.len()
        );
        Ok(())
    }

    /// Forwards a lynch or kill vote to the game.
    pub fn cast_vote(&mut self, voter: UserId, target: Option<UserId>) -> Result<(), GameError> {
        let Lifecycle::Playing { game } = &mut self.state else {
            return Err(GameError::GameNotInProgress);
        };
        let notices = game.cast_vote(voter, target)?;
        let outcome = game.outcome();
        self.deliver(&notices);
        self.check_over(outcome.is_some());
        Ok(())
    }

    /// Forwards a no-lynch vote to the game.
    pub fn vote_no_lynch(&mut self, voter: UserId) -> Result<(), GameError> {
        let Lifecycle::Playing { game } = &mut self.state else {
            return Err(GameError::GameNotInProgress);
        };
        let notices = game.vote_no_lynch(voter)?;
        let outcome = game.outcome();
        self.deliver(&notices);
        self.check_over(outcome.is_some());
        Ok(())
    }

    /// Ends the session. Terminal: the session never accepts players again.
    pub fn end_game(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameNotInProgress);
        }
        self.cancel_timer();
        self.state = Lifecycle::Ended;
        log::info!("Ended game on channel {}", self.channel);
        Ok(())
    }

    fn check_over(&mut self, over: bool) {
        if over {
            self.state = Lifecycle::Ended;
            log::info!("Game over on channel {}", self.channel);
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(cancel) = self.join_timer.take() {
            cancel.send(true).ok();
        }
    }

    /// Hands each notice to the notifier.
    fn deliver(&self, notices: &[Notice]) {
        for notice in notices {
            let text = notice.event.to_string();
            match notice.recipient {
                Recipient::Channel => self.notifier.notify_channel(self.channel, &text),
                Recipient::Player(id) => self.notifier.notify_player(id, &text),
            }
        }
    }
}
