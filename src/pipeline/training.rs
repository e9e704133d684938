//! Training driver for the Q-learning agent

use std::{
    path::Path,
    time::{Duration, Instant},
};

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    config::{TrainingConfig, TrainingRoutine},
    ports::{Agent, request_legal_move},
    q_learning::QLearningAgent,
    tictactoe::{Board, GameOutcome, Player},
};

/// Result of a training run, counted from the learner's side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Total games played
    pub games_played: usize,

    /// Wall-clock time spent
    pub elapsed_secs: f64,

    /// Games the learner won
    pub learner_wins: usize,

    pub draws: usize,

    /// Games the learner lost
    pub losses: usize,

    /// Mean magnitude of the per-game value change
    pub mean_update: f64,
}

impl TrainingReport {
    pub fn win_rate(&self) -> f64 {
        self.rate(self.learner_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    fn rate(&self, count: usize) -> f64 {
        if self.games_played > 0 {
            count as f64 / self.games_played as f64
        } else {
            0.0
        }
    }

    /// Save report to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// How long a training run lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingBudget {
    Games(usize),
    /// Checked between games only; a started game always finishes
    Duration(Duration),
}

/// A configured training run with optional progress reporting
pub struct TrainingSession {
    config: TrainingConfig,
    progress: Option<ProgressBar>,
}

impl TrainingSession {
    /// # Errors
    ///
    /// Returns error if the configuration does not validate.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress: None,
        })
    }

    /// Advance `progress` once per finished game
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `learner` against `teacher` until the budget runs out.
    ///
    /// The first mover alternates every game, starting with the learner.
    /// The first mover plays `Player::X`. When the teacher opens, its move is
    /// applied before the learner's routine takes over.
    ///
    /// # Errors
    ///
    /// Returns error on an invalid board size and propagates agent errors.
    pub fn run(
        &mut self,
        learner: &mut QLearningAgent,
        teacher: &mut dyn Agent,
        budget: TrainingBudget,
    ) -> Result<TrainingReport> {
        info!(
            learner = learner.name(),
            teacher = teacher.name(),
            routine = ?self.config.routine,
            ?budget,
            "training started"
        );

        let start = Instant::now();
        let mut report = TrainingReport::default();
        let mut trained_games = 0usize;
        let mut update_total = 0.0;

        loop {
            let keep_going = match budget {
                TrainingBudget::Games(games) => report.games_played < games,
                TrainingBudget::Duration(limit) => start.elapsed() < limit,
            };
            if !keep_going {
                break;
            }

            let learner_first = report.games_played.is_multiple_of(2);
            let (reward, update) = self.play_one(learner, teacher, learner_first)?;
            if let Some(delta) = update {
                trained_games += 1;
                update_total += delta.abs();
            }

            if reward > 0.0 {
                report.learner_wins += 1;
            } else if reward < 0.0 {
                report.losses += 1;
            } else {
                report.draws += 1;
            }
            report.games_played += 1;

            if let Some(progress) = &self.progress {
                progress.inc(1);
                if report.games_played.is_multiple_of(100) {
                    progress.set_message(format!("win {:.1}%", report.win_rate() * 100.0));
                }
            }
        }

        report.elapsed_secs = start.elapsed().as_secs_f64();
        if trained_games > 0 {
            report.mean_update = update_total / trained_games as f64;
        }
        if let Some(progress) = &self.progress {
            progress.finish_with_message("done");
        }

        debug!(
            states = learner.q_table().state_count(),
            values = learner.q_table().len(),
            mean_update = report.mean_update,
            "q-table after training"
        );
        info!(
            games = report.games_played,
            wins = report.learner_wins,
            draws = report.draws,
            losses = report.losses,
            elapsed_secs = report.elapsed_secs,
            "training finished"
        );
        Ok(report)
    }

    /// One game; returns the learner's reward and, if the learner's routine
    /// ran, its mean update.
    fn play_one(
        &self,
        learner: &mut QLearningAgent,
        teacher: &mut dyn Agent,
        learner_first: bool,
    ) -> Result<(f64, Option<f64>)> {
        let (learner_side, teacher_side) = if learner_first {
            (Player::X, Player::O)
        } else {
            (Player::O, Player::X)
        };
        learner.set_player(learner_side);
        teacher.set_player(teacher_side);

        let mut board = Board::new(self.config.board_size)?;
        if !learner_first {
            request_legal_move(teacher, &mut board)?;
            // Only a 1×1 board can end on the opening move
            if board.is_finished() {
                return Ok((GameOutcome::of(&board).reward_for(learner_side), None));
            }
        }

        let schedule = self.config.discount;
        let discount = move |depth: usize| schedule.factor(depth);
        let learning_rate = self.config.learning_rate;
        let update = match self.config.routine {
            TrainingRoutine::AgainstTeacher => {
                learner.train_one_game(learning_rate, &discount, &mut board, teacher)?
            }
            TrainingRoutine::SelfPlay => {
                learner.train_one_game_self_play(learning_rate, &discount, &mut board)?
            }
        };
        let reward = GameOutcome::of(&board).reward_for(learner_side);
        debug_assert_eq!(reward, update.reward);
        Ok((reward, Some(update.mean_delta)))
    }
}

/// Train for a fixed number of games
///
/// # Errors
///
/// Returns error on an invalid configuration and propagates agent errors.
pub fn train_for_games(
    learner: &mut QLearningAgent,
    teacher: &mut dyn Agent,
    config: &TrainingConfig,
    games: usize,
) -> Result<TrainingReport> {
    TrainingSession::new(config.clone())?.run(learner, teacher, TrainingBudget::Games(games))
}

/// Train until `duration` has elapsed, checking the clock between games
///
/// # Errors
///
/// Returns error on an invalid configuration and propagates agent errors.
pub fn train_for_duration(
    learner: &mut QLearningAgent,
    teacher: &mut dyn Agent,
    config: &TrainingConfig,
    duration: Duration,
) -> Result<TrainingReport> {
    TrainingSession::new(config.clone())?.run(
        learner,
        teacher,
        TrainingBudget::Duration(duration),
    )
}
