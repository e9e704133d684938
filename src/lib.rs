//! N×N tic-tac-toe with a perfect search player and a tabular Q-learner
//!
//! This crate provides:
//! - The board: legality, win detection, candidate moves and state keys
//! - A minimax player with alpha-beta pruning
//! - A Q-learning player trained from whole games, against a teacher or itself
//! - Random and human players behind the same agent interface
//! - Match and training drivers, Q-table persistence and a CLI

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod utils;

pub use error::{Error, Result};
