//! N×N noughts and crosses: board, winning lines and game records

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Action, Board, Candidate, Cell, Player, StateKey};
pub use game::{GameOutcome, GameRecord, Move};
pub use lines::LineSet;
