//! Game outcomes and records

use serde::{Deserialize, Serialize};

use super::board::{Action, Board, Player};

/// A move applied to the authoritative board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub action: Action,
    pub player: Player,
}

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of a finished board
    pub fn of(board: &Board) -> Self {
        board.winner().map_or(GameOutcome::Draw, GameOutcome::Win)
    }

    /// Terminal reward from `player`'s point of view: +1 win, 0 draw, -1 loss
    pub fn reward_for(self, player: Player) -> f64 {
        match self {
            GameOutcome::Win(winner) if winner == player => 1.0,
            GameOutcome::Win(_) => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }
}

/// A finished game: its outcome, final board and the moves that led there
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub board: Board,
    pub moves: Vec<Move>,
}

impl GameRecord {
    /// Rebuild the board position after each recorded move, starting from `initial`
    pub fn replay(&self, initial: &Board) -> Vec<Board> {
        let mut board = initial.clone();
        let mut states = Vec::with_capacity(self.moves.len() + 1);
        states.push(board.clone());
        for mv in &self.moves {
            board.place(mv.action, mv.player);
            states.push(board.clone());
        }
        states
    }
}
