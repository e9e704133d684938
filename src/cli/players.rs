//! Building agents from command-line choices

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;

use crate::{
    agents::{HumanAgent, MinimaxAgent, RandomAgent},
    ports::Agent,
    q_learning::{QLearningAgent, SavedQAgent},
    tictactoe::Player,
};

/// Kinds of player selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    /// Reads moves from the terminal
    Human,
    /// Uniformly random legal moves
    Random,
    /// Perfect play by exhaustive search
    Minimax,
    /// Greedy play from a saved Q-table (needs --qtable)
    Qlearner,
}

impl PlayerKind {
    pub fn label(self) -> &'static str {
        match self {
            PlayerKind::Human => "human",
            PlayerKind::Random => "random",
            PlayerKind::Minimax => "minimax",
            PlayerKind::Qlearner => "qlearner",
        }
    }
}

/// Load a saved Q-learning agent for `player`
pub fn load_learner(path: &Path, player: Player, seed: Option<u64>) -> Result<QLearningAgent> {
    let saved = SavedQAgent::load_from_file(path)?;
    let agent = saved
        .to_agent(player)
        .with_context(|| format!("Failed to restore Q-table from {}", path.display()))?;
    Ok(match seed {
        Some(seed) => agent.with_seed(seed),
        None => agent,
    })
}

/// Create an agent of the given kind
pub fn build_agent(
    kind: PlayerKind,
    player: Player,
    qtable: Option<&Path>,
    seed: Option<u64>,
) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        PlayerKind::Human => Box::new(HumanAgent::stdio(player)),
        PlayerKind::Random => {
            let agent = RandomAgent::new(player);
            Box::new(match seed {
                Some(seed) => agent.with_seed(seed),
                None => agent,
            })
        }
        PlayerKind::Minimax => {
            let agent = MinimaxAgent::new(player);
            Box::new(match seed {
                Some(seed) => agent.with_seed(seed),
                None => agent,
            })
        }
        PlayerKind::Qlearner => {
            let path = qtable.ok_or_else(|| anyhow!("A qlearner player needs --qtable <file>"))?;
            Box::new(load_learner(path, player, seed)?)
        }
    };
    Ok(agent)
}
