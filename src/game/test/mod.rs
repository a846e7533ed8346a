//! Test module for the Mafia game engine.

#![cfg(test)]
#![allow(clippy::bool_assert_comparison)]

pub mod phase_transitions;
pub mod test_utils;
