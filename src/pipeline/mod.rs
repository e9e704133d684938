//! Match and training drivers
//!
//! This module provides:
//! - Single games with move-legality enforcement
//! - Batches of games with tallied outcomes
//! - Training runs bounded by a game count or a wall-clock budget

pub mod match_play;
pub mod training;

pub use match_play::{MatchTally, play_game, run_match};
pub use training::{
    TrainingBudget, TrainingReport, TrainingSession, train_for_duration, train_for_games,
};
