//! Common test utilities for the noughts test suite.
//!
//! Board builders, a scripted agent and a brute-force game solver used to
//! check the search player.

#![allow(dead_code)]

use noughts::{
    Result,
    ports::Agent,
    tictactoe::{Action, Board, Player},
};

/// Parse a board from `.`/`X`/`O` text
pub fn board(text: &str) -> Board {
    Board::from_string(text).unwrap()
}

/// Cell indices of every full line of a `size`×`size` board: rows, columns,
/// then the main and anti-diagonal
pub fn full_lines(size: usize) -> Vec<Vec<usize>> {
    let n = size;
    let mut lines = Vec::with_capacity(2 * n + 2);
    lines.extend((0..n).map(|row| (0..n).map(|col| row * n + col).collect()));
    lines.extend((0..n).map(|col| (0..n).map(|row| row * n + col).collect()));
    lines.push((0..n).map(|i| i * n + i).collect());
    lines.push((0..n).map(|i| (n - 1 - i) * n + i).collect());
    lines
}

/// Plays a fixed list of proposals, legal or not, and keeps a copy of every
/// board it was shown.
pub struct ScriptedAgent {
    player: Player,
    moves: Vec<Action>,
    next: usize,
    pub seen: Vec<Board>,
}

impl ScriptedAgent {
    pub fn new(player: Player, moves: &[(usize, usize)]) -> Self {
        Self {
            player,
            moves: moves.iter().map(|&(r, c)| Action::new(r, c)).collect(),
            next: 0,
            seen: Vec::new(),
        }
    }

    pub fn proposals_made(&self) -> usize {
        self.next
    }
}

impl Agent for ScriptedAgent {
    fn propose_move(&mut self, board: &Board) -> Result<Action> {
        self.seen.push(board.clone());
        let action = self.moves[self.next];
        self.next += 1;
        Ok(action)
    }

    fn set_player(&mut self, player: Player) {
        self.player = player;
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

/// Exact game value for `me` with `to_move` about to play, by exhaustive
/// search without pruning: +1 win, 0 draw, -1 loss.
pub fn solve(board: &Board, to_move: Player, me: Player) -> i32 {
    if board.is_winner(me) {
        return 1;
    }
    if board.is_winner(me.opponent()) {
        return -1;
    }
    if board.is_finished() {
        return 0;
    }

    let values = board
        .candidates(to_move)
        .into_iter()
        .map(|candidate| solve(&candidate.board, to_move.opponent(), me));
    if to_move == me {
        values.max().unwrap_or(0)
    } else {
        values.min().unwrap_or(0)
    }
}
