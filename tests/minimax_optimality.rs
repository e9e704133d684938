//! The search player's scores match exhaustive game values

mod common;

use common::{board, solve};
use noughts::{
    agents::{MinimaxAgent, RandomAgent},
    pipeline::run_match,
    ports::Agent,
    tictactoe::{Action, Player},
};

const POSITIONS: &[(&str, Player)] = &[
    ("X.. ... ...", Player::O),
    ("X.. .O. ...", Player::X),
    ("XO. ... ...", Player::X),
    (".X. ... ..O", Player::X),
    ("X.. .O. ..X", Player::O),
    ("XO. .X. ...", Player::O),
    ("XX. OO. X.O", Player::X),
    ("X.O .O. X..", Player::X),
];

#[test]
fn scores_equal_brute_force_values() {
    for &(text, to_move) in POSITIONS {
        let position = board(text);
        let agent = MinimaxAgent::new(to_move);
        for (action, score) in agent.score_moves(&position) {
            let mut next = position.clone();
            assert!(next.place(action, to_move));
            let expected = solve(&next, to_move.opponent(), to_move);
            assert_eq!(score, expected, "{text}: move {action}");
        }
    }
}

#[test]
fn chosen_move_has_the_best_score() {
    for &(text, to_move) in POSITIONS {
        let position = board(text);
        let mut agent = MinimaxAgent::new(to_move).with_seed(17);
        let scores = agent.score_moves(&position);
        let best = scores.iter().map(|&(_, s)| s).max().unwrap();
        for _ in 0..10 {
            let action = agent.propose_move(&position).unwrap();
            let score = scores.iter().find(|(a, _)| *a == action).unwrap().1;
            assert_eq!(score, best, "{text}: chose {action}");
        }
    }
}

#[test]
fn single_optimal_move_is_always_chosen() {
    // O must block the top row
    let position = board("XX. .O. ...");
    for seed in 0..10 {
        let mut agent = MinimaxAgent::new(Player::O).with_seed(seed);
        assert_eq!(agent.propose_move(&position).unwrap(), Action::new(0, 2));
    }
}

#[test]
fn ties_are_broken_across_optimal_moves() {
    // Every reply to a centre opening except the edges holds the draw; corners tie
    let position = board("... .X. ...");
    let mut agent = MinimaxAgent::new(Player::O).with_seed(5);
    let mut corners = std::collections::HashSet::new();
    for _ in 0..100 {
        corners.insert(agent.propose_move(&position).unwrap());
    }
    let all_corners: std::collections::HashSet<_> = [
        Action::new(0, 0),
        Action::new(0, 2),
        Action::new(2, 0),
        Action::new(2, 2),
    ]
    .into_iter()
    .collect();
    assert_eq!(corners, all_corners);
}

#[test]
fn never_loses_as_either_side() {
    let mut minimax = MinimaxAgent::new(Player::X).with_seed(1);
    let mut random = RandomAgent::new(Player::O).with_seed(2);
    let tally = run_match(&mut minimax, &mut random, 30, 3).unwrap();
    assert_eq!(tally.player2_wins, 0);

    let tally = run_match(&mut random, &mut minimax, 30, 3).unwrap();
    assert_eq!(tally.player2_wins + tally.draws, 30);
}

#[test]
fn two_by_two_first_player_always_wins() {
    let mut first = MinimaxAgent::new(Player::X).with_seed(3);
    let mut second = MinimaxAgent::new(Player::O).with_seed(4);
    let tally = run_match(&mut first, &mut second, 5, 2).unwrap();
    assert_eq!(tally.player1_wins, 5);
}
