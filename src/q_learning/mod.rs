//! Tabular Q-learning for the N×N game
//!
//! The learner keeps one value per `(grid, cell)` pair and learns from
//! whole games, either against another agent or against itself.
//!
//! ## Update rule
//!
//! After a game ends, every move the learner made is updated, last first:
//!
//! ```text
//! Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ(d)·max_a' Q(s,a'))
//! ```
//!
//! where `r` is the terminal reward (+1, 0, -1), `d` the move's depth and
//! `γ(d)` the discount for that depth. The learner's final move has depth 1,
//! or 2 if the opponent's reply ended the game; each earlier move of the
//! learner adds one.
//!
//! ## Usage Example
//!
//! ```no_run
//! use noughts::{
//!     agents::MinimaxAgent,
//!     q_learning::QLearningAgent,
//!     tictactoe::{Board, Player},
//! };
//!
//! let mut learner = QLearningAgent::new(Player::X).with_seed(1);
//! let mut teacher = MinimaxAgent::new(Player::O);
//! let mut board = Board::default();
//! let update = learner.train_one_game(0.3, &|_| 0.9, &mut board, &mut teacher)?;
//! println!("reward {} at depth {}", update.reward, update.depth);
//! # Ok::<(), noughts::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

pub use agent::{GameUpdate, QLearningAgent};
pub use q_table::{QEntry, QTable};
pub use serialization::{SaveMetadata, SavedQAgent};
