//! Evaluate command - Measure a trained Q-table against an opponent

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        output::{print_kv, print_section, print_tally},
        players::{PlayerKind, build_agent},
    },
    pipeline::{MatchTally, run_match},
    q_learning::SavedQAgent,
    tictactoe::{Board, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained Q-table")]
pub struct EvaluateArgs {
    /// Path to the trained Q-table
    #[arg(long)]
    pub qtable: PathBuf,

    /// Opponent to evaluate against
    #[arg(long, short = 'o', value_enum, default_value = "minimax")]
    pub opponent: PlayerKind,

    /// Saved Q-table for a qlearner opponent
    #[arg(long)]
    pub opponent_qtable: Option<PathBuf>,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Board dimension N (defaults to the size the table was trained on)
    #[arg(long)]
    pub board_size: Option<usize>,

    /// Let the opponent move first
    #[arg(long, default_value_t = false)]
    pub second: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Evaluation result from the learner's side
#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    pub opponent: String,
    pub learner_first: bool,
    pub board_size: usize,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub tally: MatchTally,
}

impl EvaluationSummary {
    fn new(opponent: PlayerKind, learner_first: bool, board_size: usize, tally: MatchTally) -> Self {
        let (wins, losses) = if learner_first {
            (tally.player1_wins, tally.player2_wins)
        } else {
            (tally.player2_wins, tally.player1_wins)
        };
        Self {
            opponent: opponent.label().to_string(),
            learner_first,
            board_size,
            games: tally.total(),
            wins,
            draws: tally.draws,
            losses,
            tally,
        }
    }
}

pub fn execute(args: EvaluateArgs) -> Result<EvaluationSummary> {
    println!("Loading Q-table from: {}", args.qtable.display());
    let saved = SavedQAgent::load_from_file(&args.qtable)?;
    let board_size = args
        .board_size
        .or(saved.metadata.board_size)
        .unwrap_or(Board::DEFAULT_SIZE);

    print_section("Loaded agent");
    print_kv("Entries", &saved.entry_count().to_string());
    print_kv("Games trained", &saved.metadata.games_trained.to_string());
    if let Some(teacher) = &saved.metadata.teacher {
        print_kv("Trained against", teacher);
    }

    let mut learner = saved.to_agent(Player::X)?;
    if let Some(seed) = args.seed {
        learner = learner.with_seed(seed);
    }
    let mut opponent = build_agent(
        args.opponent,
        Player::O,
        args.opponent_qtable.as_deref(),
        args.seed.map(|s| s.wrapping_add(1)),
    )?;

    let tally = if args.second {
        run_match(opponent.as_mut(), &mut learner, args.games, board_size)?
    } else {
        run_match(&mut learner, opponent.as_mut(), args.games, board_size)?
    };

    print_section("Evaluation");
    if args.second {
        print_tally(&tally, args.opponent.label(), "qlearner");
    } else {
        print_tally(&tally, "qlearner", args.opponent.label());
    }

    let summary = EvaluationSummary::new(args.opponent, !args.second, board_size, tally);
    if let Some(path) = &args.export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary).context("Failed to write evaluation")?;
        print_kv("Exported to", &path.display().to_string());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_learner_side() {
        let tally = MatchTally {
            player1_wins: 1,
            player2_wins: 5,
            draws: 4,
        };
        let first = EvaluationSummary::new(PlayerKind::Random, true, 3, tally);
        assert_eq!((first.wins, first.losses), (1, 5));
        let second = EvaluationSummary::new(PlayerKind::Random, false, 3, tally);
        assert_eq!((second.wins, second.losses), (5, 1));
        assert_eq!(second.games, 10);
    }
}
