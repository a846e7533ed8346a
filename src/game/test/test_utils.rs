//! Test utilities and helper functions for game testing.

use super::super::{Game, GameOptions, Notice, Phase, Role, UserId};

/// Builds a roster of `num_players` users named `Player0`, `Player1`, ...
pub fn roster(num_players: usize) -> Vec<(UserId, String)> {
    (0..num_players)
        .map(|i| (UserId(i as u64), format!("Player{}", i)))
        .collect()
}

/// Creates a test game with the specified number of players.
pub fn create_test_game(num_players: usize, seed: u64) -> Game {
    Game::new(&roster(num_players), &GameOptions::default(), seed).unwrap()
}

/// Creates a test game and advances it to Day 1, discarding the opening notices.
pub fn create_started_game(num_players: usize, seed: u64) -> Game {
    let mut game = create_test_game(num_players, seed);
    game.begin();
    game
}

pub fn mafia_ids(game: &Game) -> Vec<UserId> {
    game.players()
        .iter()
        .filter(|p| p.alive && p.role == Role::Mafia)
        .map(|p| p.id)
        .collect()
}

pub fn town_ids(game: &Game) -> Vec<UserId> {
    game.players()
        .iter()
        .filter(|p| p.alive && p.role == Role::Town)
        .map(|p| p.id)
        .collect()
}

pub fn alive_ids(game: &Game) -> Vec<UserId> {
    game.players()
        .iter()
        .filter(|p| p.alive)
        .map(|p| p.id)
        .collect()
}

/// Day-phase votes against `target` from living players in roster order,
/// stopping as soon as the vote becomes decisive.
pub fn lynch_by_majority(game: &mut Game, target: UserId) -> Vec<Notice> {
    let mut notices = vec![];
    for voter in alive_ids(game) {
        notices.extend(game.cast_vote(voter, Some(target)).unwrap());
        if game.phase() != Phase::Day || game.outcome().is_some() {
            break;
        }
    }
    notices
}

/// Night-phase votes against `target` from the living mafia in roster order,
/// stopping as soon as the vote becomes decisive.
pub fn kill_by_majority(game: &mut Game, target: UserId) -> Vec<Notice> {
    let mut notices = vec![];
    for voter in mafia_ids(game) {
        notices.extend(game.cast_vote(voter, Some(target)).unwrap());
        if game.phase() != Phase::Night || game.outcome().is_some() {
            break;
        }
    }
    notices
}

/// Checks the structural tally invariants: the vote counts sum to the number
/// of living players with a standing vote, the no-lynch count matches the
/// players marked no-lynch, and no player holds both a vote and a no-lynch.
pub fn assert_tally_invariants(game: &Game) {
    let standing_votes = game
        .players()
        .iter()
        .filter(|p| p.alive && p.votes_for.is_some())
        .count();
    assert_eq!(game.tally().total_votes(), standing_votes);

    let no_lynchers = game
        .players()
        .iter()
        .filter(|p| p.alive && p.no_lynch)
        .count();
    assert_eq!(game.tally().no_lynch(), no_lynchers);

    for player in game.players() {
        assert!(
            !(player.votes_for.is_some() && player.no_lynch),
            "{} holds both a vote and a no-lynch",
            player.name
        );
    }
}
