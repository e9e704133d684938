//! Match driver: single games and tallied batches

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    ports::{Agent, request_legal_move},
    tictactoe::{Board, GameOutcome, GameRecord, Move, Player},
};

/// Play one game to the end on `board`, `player1` moving first.
///
/// Each agent only ever sees a copy of the live board. An illegal proposal
/// is discarded and the same agent is asked again. The game is a draw as
/// soon as the board fills up without a winner.
///
/// # Errors
///
/// Propagates errors from either agent.
pub fn play_game(
    player1: &mut dyn Agent,
    player2: &mut dyn Agent,
    mut board: Board,
) -> Result<GameRecord> {
    let mut moves = Vec::new();
    let mut first_to_move = true;

    loop {
        if board.is_finished() {
            return Ok(GameRecord {
                outcome: GameOutcome::Draw,
                board,
                moves,
            });
        }

        let mover: &mut dyn Agent = if first_to_move {
            &mut *player1
        } else {
            &mut *player2
        };
        let player = mover.player();
        let action = request_legal_move(mover, &mut board)?;
        moves.push(Move { action, player });

        if board.is_winner(player) {
            return Ok(GameRecord {
                outcome: GameOutcome::Win(player),
                board,
                moves,
            });
        }
        first_to_move = !first_to_move;
    }
}

/// Outcome counts over a batch of games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub draws: usize,
}

fn rate(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64
    } else {
        0.0
    }
}

impl MatchTally {
    /// Count one outcome; player 1 is always `Player::X`
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Player::X) => self.player1_wins += 1,
            GameOutcome::Win(Player::O) => self.player2_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.player1_wins + self.player2_wins + self.draws
    }

    pub fn player1_win_rate(&self) -> f64 {
        rate(self.player1_wins, self.total())
    }

    pub fn player2_win_rate(&self) -> f64 {
        rate(self.player2_wins, self.total())
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.total())
    }

    /// Save tally to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Play `games` independent games on fresh `board_size` boards.
///
/// `player1` is reassigned to `Player::X` and always moves first;
/// `player2` becomes `Player::O`.
///
/// # Errors
///
/// Returns error on an invalid board size and propagates agent errors.
pub fn run_match(
    player1: &mut dyn Agent,
    player2: &mut dyn Agent,
    games: usize,
    board_size: usize,
) -> Result<MatchTally> {
    player1.set_player(Player::X);
    player2.set_player(Player::O);

    let mut tally = MatchTally::default();
    for _ in 0..games {
        let record = play_game(player1, player2, Board::new(board_size)?)?;
        tally.record(record.outcome);
    }

    debug!(
        player1 = player1.name(),
        player2 = player2.name(),
        player1_wins = tally.player1_wins,
        player2_wins = tally.player2_wins,
        draws = tally.draws,
        "match finished"
    );
    Ok(tally)
}
