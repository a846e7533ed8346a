//! Phase machine tests: majority resolution, tally resets, and the
//! day counter.

use super::super::{Event, Phase, Recipient};
use super::test_utils::*;

#[test]
fn three_votes_of_five_lynch_the_target() {
    let mut game = create_started_game(5, 42);
    let voters = alive_ids(&game);
    let target = town_ids(&game)[0];
    let target_idx = game.find_player(target).unwrap();

    // Two votes are short of floor(5/2) + 1 = 3.
    game.cast_vote(voters[0], Some(target)).unwrap();
    let notices = game.cast_vote(voters[1], Some(target)).unwrap();
    assert_eq!(game.phase(), Phase::Day);
    assert!(game.players()[target_idx].alive);
    assert!(!notices
        .iter()
        .any(|n| matches!(n.event, Event::Lynched { .. })));

    // The third vote is decisive.
    let notices = game.cast_vote(voters[2], Some(target)).unwrap();
    assert!(!game.players()[target_idx].alive);
    assert_eq!(game.phase(), Phase::Night);
    assert!(notices
        .iter()
        .any(|n| matches!(n.event, Event::Lynched { .. })
            && n.recipient == Recipient::Channel));
}

#[test]
fn three_no_lynch_votes_of_five_skip_the_day() {
    let mut game = create_started_game(5, 42);
    let voters = alive_ids(&game);

    game.vote_no_lynch(voters[0]).unwrap();
    game.vote_no_lynch(voters[1]).unwrap();
    assert_eq!(game.phase(), Phase::Day);

    // ceil(5/2) = 3 no-lynch votes end the day with nobody eliminated.
    let notices = game.vote_no_lynch(voters[2]).unwrap();
    assert_eq!(game.phase(), Phase::Night);
    assert_eq!(game.num_alive(), 5);
    assert!(notices
        .iter()
        .any(|n| matches!(n.event, Event::NoLynchResult)));
}

#[test]
fn every_transition_resets_votes_and_tally() {
    let mut game = create_started_game(5, 42);
    let voters = alive_ids(&game);
    let target = town_ids(&game)[0];

    // Leave some residue: one standing vote, one no-lynch, then force the
    // transition with a majority against the target.
    game.vote_no_lynch(voters[4]).unwrap();
    lynch_by_majority(&mut game, target);
    assert_eq!(game.phase(), Phase::Night);

    for player in game.players() {
        assert_eq!(player.votes_for, None);
        assert_eq!(player.no_lynch, false);
    }
    assert_eq!(game.tally().total_votes(), 0);
    assert_eq!(game.tally().no_lynch(), 0);

    // The fresh tally's candidates are exactly the living roster.
    assert_eq!(game.tally().num_candidates(), game.num_alive());
    for (idx, player) in game.players().iter().enumerate() {
        assert_eq!(game.tally().is_candidate(idx), player.alive);
    }
    assert_tally_invariants(&game);
}

#[test]
fn day_number_increments_only_when_night_turns_to_day() {
    let mut game = create_started_game(5, 42);
    assert_eq!(game.day(), 1);

    // Day 1 ends with a lynch; still day 1 during the night.
    let target = town_ids(&game)[0];
    lynch_by_majority(&mut game, target);
    assert_eq!(game.phase(), Phase::Night);
    assert_eq!(game.day(), 1);

    // The night kill opens day 2.
    let victim = town_ids(&game)[0];
    let notices = kill_by_majority(&mut game, victim);
    assert_eq!(game.phase(), Phase::Day);
    assert_eq!(game.day(), 2);
    assert!(matches!(
        notices.last().map(|n| &n.event),
        Some(Event::PhaseBegan { phase: Phase::Day, day: 2 })
    ));
}

#[test]
fn night_kill_needs_a_mafia_majority() {
    // 8 players, two mafiosi: one night vote is short of floor(2/2) + 1 = 2.
    let mut game = create_started_game(8, 42);
    let mislynched = town_ids(&game)[0];
    lynch_by_majority(&mut game, mislynched);
    assert_eq!(game.phase(), Phase::Night);

    let mafia = mafia_ids(&game);
    let victim = town_ids(&game)[0];
    let victim_idx = game.find_player(victim).unwrap();

    game.cast_vote(mafia[0], Some(victim)).unwrap();
    assert!(game.players()[victim_idx].alive);
    assert_eq!(game.phase(), Phase::Night);

    let notices = game.cast_vote(mafia[1], Some(victim)).unwrap();
    assert!(!game.players()[victim_idx].alive);
    assert_eq!(game.phase(), Phase::Day);

    // The kill itself is announced publicly, come morning.
    let killed = notices
        .iter()
        .find(|n| matches!(n.event, Event::Killed { .. }))
        .expect("the kill should be announced");
    assert_eq!(killed.recipient, Recipient::Channel);
}

#[test]
fn the_mafia_can_decline_to_kill() {
    let mut game = create_started_game(8, 42);
    let mislynched = town_ids(&game)[0];
    lynch_by_majority(&mut game, mislynched);
    assert_eq!(game.phase(), Phase::Night);

    let mafia = mafia_ids(&game);
    let alive_before = game.num_alive();

    // ceil(2/2) = 1 no-lynch vote among the mafia ends the night at once,
    // with nobody eliminated.
    let notices = game.vote_no_lynch(mafia[0]).unwrap();
    assert_eq!(game.phase(), Phase::Day);
    assert_eq!(game.day(), 2);
    assert_eq!(game.num_alive(), alive_before);
    assert!(notices
        .iter()
        .any(|n| matches!(n.event, Event::NoLynchResult)));
}
