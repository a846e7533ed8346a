use crate::game::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to the chat channel a game is being played on.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The outbound-message capability the engine requires of its transport.
///
/// Calls are fire-and-forget; the engine tracks no acknowledgements. A
/// transport that performs async I/O should enqueue the message and return.
pub trait Notifier: Send + Sync {
    /// Sends a message to a channel.
    fn notify_channel(&self, channel: ChannelId, text: &str);

    /// Sends a private message to a player.
    fn notify_player(&self, player: UserId, text: &str);
}

/// A notifier that writes every message to the log. Useful for local runs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_channel(&self, channel: ChannelId, text: &str) {
        log::info!("[#{}] {}", channel, text);
    }

    fn notify_player(&self, player: UserId, text: &str) {
        log::info!("[@{}] {}", player, text);
    }
}
