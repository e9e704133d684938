//! Uniform random baseline

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{Action, Board, Player},
    utils::build_rng,
};

/// Picks any empty cell with equal probability
#[derive(Debug, Clone)]
pub struct RandomAgent {
    player: Player,
    rng: StdRng,
    name: String,
}

impl RandomAgent {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            rng: build_rng(None),
            name: "Random".to_string(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Agent for RandomAgent {
    fn propose_move(&mut self, board: &Board) -> Result<Action> {
        board
            .empty_cells()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidMoves)
    }

    fn set_player(&mut self, player: Player) {
        self.player = player;
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &str {
        &self.name
    }
}
