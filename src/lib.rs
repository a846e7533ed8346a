//! A social deduction party-game engine for Mafia.
//!
//! The engine tracks players, assigns hidden roles, advances alternating
//! Day/Night phases, and resolves group voting into eliminations. It is
//! transport-agnostic: inbound events arrive as method calls on a
//! [session::Session], and everything outbound goes through the
//! [notifier::Notifier] capability supplied by the embedding chat bot.

pub mod error;
pub mod game;
pub mod notifier;
pub mod session;
