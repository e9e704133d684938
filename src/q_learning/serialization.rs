//! Saving and loading trained Q-learning agents.
//!
//! MessagePack is the default format. A path ending in `.json` is written
//! and read as JSON instead, which is handy for inspecting a small table.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    config::TrainingRoutine,
    q_learning::{
        agent::QLearningAgent,
        q_table::{QEntry, QTable},
    },
    tictactoe::Player,
};

/// How a saved agent was trained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub games_trained: usize,
    pub board_size: Option<usize>,
    pub routine: Option<TrainingRoutine>,
    pub teacher: Option<String>,
}

/// On-disk form of a Q-learning agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQAgent {
    pub version: u32,
    pub temperature: f64,
    pub metadata: SaveMetadata,
    entries: Vec<QEntry>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl SavedQAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: SaveMetadata) -> Self {
        let mut entries: Vec<QEntry> = agent.q_table().entries().collect();
        // HashMap order is arbitrary; sort so identical tables save identically
        entries.sort_by(|a, b| a.state.cmp(&b.state).then(a.action.cmp(&b.action)));
        Self {
            version: Self::VERSION,
            temperature: agent.temperature(),
            metadata,
            entries,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Rebuild the agent for the given side
    pub fn to_agent(&self, player: Player) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported Q-table save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        Ok(QLearningAgent::new(player)
            .with_temperature(self.temperature)
            .with_q_table(QTable::from_entries(self.entries.iter().cloned())))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        if is_json(path) {
            serde_json::to_writer_pretty(&mut writer, self)
                .context("Failed to serialize Q-learning agent")?;
        } else {
            rmp_serde::encode::write(&mut writer, self)
                .context("Failed to serialize Q-learning agent")?;
        }

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let reader = BufReader::new(file);

        if is_json(path) {
            serde_json::from_reader(reader).context("Failed to deserialize Q-learning agent")
        } else {
            rmp_serde::decode::from_read(reader).context("Failed to deserialize Q-learning agent")
        }
    }
}
