//! Train command - Train a Q-learning agent against a teacher or itself

use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::{ArgGroup, Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    agents::RandomAgent,
    cli::{
        output::{create_training_progress, print_kv, print_section, print_training_report},
        players::{PlayerKind, build_agent},
    },
    config::{AgentConfig, DEFAULT_TEMPERATURE, DiscountSchedule, TrainingConfig, TrainingRoutine},
    pipeline::{TrainingBudget, TrainingReport, TrainingSession},
    ports::Agent,
    q_learning::{QLearningAgent, SaveMetadata, SavedQAgent},
    tictactoe::{Board, Player},
};

/// Who the learner trains against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TeacherKind {
    Human,
    Random,
    Minimax,
    /// A previously trained agent (needs --teacher-qtable)
    Qlearner,
    /// The learner plays both sides; a random opener starts every other game
    #[value(name = "self")]
    SelfPlay,
}

impl TeacherKind {
    fn player_kind(self) -> Option<PlayerKind> {
        match self {
            TeacherKind::Human => Some(PlayerKind::Human),
            TeacherKind::Random => Some(PlayerKind::Random),
            TeacherKind::Minimax => Some(PlayerKind::Minimax),
            TeacherKind::Qlearner => Some(PlayerKind::Qlearner),
            TeacherKind::SelfPlay => None,
        }
    }

    fn label(self) -> &'static str {
        self.player_kind().map_or("self", PlayerKind::label)
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingReport,
    teacher: &'a str,
    config: &'a TrainingConfig,
    temperature: f64,
    seed: Option<u64>,
    output: String,
    states: usize,
    q_values: usize,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    about = "Train a Q-learning agent",
    group(ArgGroup::new("budget").required(true).args(["games", "seconds"]))
)]
pub struct TrainArgs {
    /// Opponent to learn from, or `self` for self-play
    #[arg(long, short = 't', value_enum, default_value = "minimax")]
    pub teacher: TeacherKind,

    /// Saved Q-table for a qlearner teacher
    #[arg(long)]
    pub teacher_qtable: Option<PathBuf>,

    /// Number of training games
    #[arg(long, short = 'g')]
    pub games: Option<usize>,

    /// Wall-clock training budget in seconds
    #[arg(long, short = 's')]
    pub seconds: Option<f64>,

    /// Output file for the trained Q-table (.json for JSON, otherwise MessagePack)
    #[arg(long, short = 'O')]
    pub output: PathBuf,

    /// Continue training from a saved Q-table
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Learning rate α in (0, 1]
    #[arg(long, default_value_t = 0.3)]
    pub learning_rate: f64,

    /// Discount factor γ in [0, 1]
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Multiply the discount by this per step of depth from the end of the game
    #[arg(long)]
    pub discount_decay: Option<f64>,

    /// Sampling temperature for exploratory moves
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Board dimension N
    #[arg(long, default_value_t = Board::DEFAULT_SIZE)]
    pub board_size: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn training_config(&self) -> TrainingConfig {
        let discount = match self.discount_decay {
            Some(decay) => DiscountSchedule::Geometric {
                initial: self.discount,
                decay,
            },
            None => DiscountSchedule::Constant(self.discount),
        };
        let routine = if self.teacher == TeacherKind::SelfPlay {
            TrainingRoutine::SelfPlay
        } else {
            TrainingRoutine::AgainstTeacher
        };
        TrainingConfig::default()
            .with_learning_rate(self.learning_rate)
            .with_discount(discount)
            .with_routine(routine)
            .with_board_size(self.board_size)
    }

    fn budget(&self) -> Result<TrainingBudget> {
        match (self.games, self.seconds) {
            (Some(games), _) => Ok(TrainingBudget::Games(games)),
            (None, Some(seconds)) => Duration::try_from_secs_f64(seconds)
                .map(TrainingBudget::Duration)
                .map_err(|e| anyhow!("Invalid --seconds value {seconds}: {e}")),
            (None, None) => Err(anyhow!("Either --games or --seconds is required")),
        }
    }
}

fn build_teacher(args: &TrainArgs) -> Result<Box<dyn Agent>> {
    let seed = args.seed.map(|s| s.wrapping_add(1));
    match args.teacher.player_kind() {
        Some(kind) => build_agent(kind, Player::O, args.teacher_qtable.as_deref(), seed),
        None => {
            let opener = RandomAgent::new(Player::O).with_name("Opener");
            Ok(Box::new(match seed {
                Some(seed) => opener.with_seed(seed),
                None => opener,
            }))
        }
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.training_config();
    let budget = args.budget()?;

    let mut agent_config = AgentConfig::new().with_temperature(args.temperature);
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }

    let (mut learner, previous_games) = match &args.resume {
        Some(path) => {
            agent_config.validate()?;
            let saved = SavedQAgent::load_from_file(path)?;
            let restored = saved.to_agent(Player::X)?.with_temperature(args.temperature);
            let restored = match args.seed {
                Some(seed) => restored.with_seed(seed),
                None => restored,
            };
            println!(
                "Resuming from {} ({} entries)",
                path.display(),
                saved.entry_count()
            );
            (restored, saved.metadata.games_trained)
        }
        None => (QLearningAgent::from_config(Player::X, &agent_config)?, 0),
    };
    let mut teacher = build_teacher(&args)?;

    let mut session = TrainingSession::new(config.clone())?;
    if let TrainingBudget::Games(games) = budget
        && !args.no_progress
    {
        session = session.with_progress(create_training_progress(games as u64));
    }

    println!(
        "Training against {} on a {}×{} board",
        args.teacher.label(),
        config.board_size,
        config.board_size
    );
    let report = session.run(&mut learner, teacher.as_mut(), budget)?;

    let metadata = SaveMetadata {
        games_trained: previous_games + report.games_played,
        board_size: Some(config.board_size),
        routine: Some(config.routine),
        teacher: Some(args.teacher.label().to_string()),
    };
    SavedQAgent::from_agent(&learner, metadata).save_to_file(&args.output)?;

    print_section("Training complete");
    print_training_report(&report);
    print_kv("States", &learner.q_table().state_count().to_string());
    print_kv("Saved to", &args.output.display().to_string());

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: &report,
            teacher: args.teacher.label(),
            config: &config,
            temperature: learner.temperature(),
            seed: args.seed,
            output: args.output.display().to_string(),
            states: learner.q_table().state_count(),
            q_values: learner.q_table().len(),
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
