//! Noughts CLI - play, train and evaluate N×N tic-tac-toe agents
//!
//! This CLI provides:
//! - Games between humans, random players, minimax and trained Q-tables
//! - Q-learning training against a teacher or by self-play
//! - Evaluation of saved Q-tables against any opponent

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "noughts")]
#[command(version, about = "Tic-tac-toe agents: minimax search and Q-learning", long_about = None)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play games between two players
    Play(noughts::cli::commands::play::PlayArgs),

    /// Train a Q-learning agent
    Train(noughts::cli::commands::train::TrainArgs),

    /// Evaluate a trained Q-table against an opponent
    Evaluate(noughts::cli::commands::evaluate::EvaluateArgs),
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    match cli.command {
        Commands::Play(args) => noughts::cli::commands::play::execute(args),
        Commands::Train(args) => noughts::cli::commands::train::execute(args),
        Commands::Evaluate(args) => noughts::cli::commands::evaluate::execute(args).map(|_| ()),
    }
}
