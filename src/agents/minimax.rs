//! Exhaustive minimax search with alpha-beta pruning

use rand::{
    SeedableRng,
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
};
use tracing::debug;

use crate::{
    Result,
    ports::Agent,
    tictactoe::{Action, Board, Player},
    utils::build_rng,
};

/// Bound larger than any reachable score
const INFINITY: i32 = 1_000_000;

/// Perfect player for the N×N game.
///
/// Scores are exact game values from this agent's point of view: +1 win,
/// 0 draw, -1 loss. Pruning only changes how many positions are visited.
#[derive(Debug, Clone)]
pub struct MinimaxAgent {
    player: Player,
    rng: StdRng,
    name: String,
}

impl MinimaxAgent {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            rng: build_rng(None),
            name: "Minimax".to_string(),
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

    fn opponent(&self) -> Player {
        self.player.opponent()
    }

    /// Minimax value of every placement available to this agent, in
    /// row-major order.
    pub fn score_moves(&self, board: &Board) -> Vec<(Action, i32)> {
        let mut nodes = 0u64;
        let scores = board
            .candidates(self.player)
            .into_iter()
            .map(|candidate| {
                let score = self.min_score(&candidate.board, -INFINITY, INFINITY, &mut nodes);
                (candidate.action, score)
            })
            .collect();
        debug!(agent = %self.name, nodes, "minimax search finished");
        scores
    }

    /// Value of a position where this agent is about to move
    fn max_score(&self, board: &Board, mut alpha: i32, beta: i32, nodes: &mut u64) -> i32 {
        *nodes += 1;
        if board.is_winner(self.opponent()) {
            return -1;
        }
        if board.is_finished() {
            return 0;
        }

        let mut score = -INFINITY;
        for candidate in board.candidates(self.player) {
            score = score.max(self.min_score(&candidate.board, alpha, beta, nodes));
            if score >= beta {
                break;
            }
            alpha = alpha.max(score);
        }
        score
    }

    /// Value of a position where the opponent is about to move
    fn min_score(&self, board: &Board, alpha: i32, mut beta: i32, nodes: &mut u64) -> i32 {
        *nodes += 1;
        if board.is_winner(self.player) {
            return 1;
        }
        if board.is_finished() {
            return 0;
        }

        let mut score = INFINITY;
        for candidate in board.candidates(self.opponent()) {
            score = score.min(self.max_score(&candidate.board, alpha, beta, nodes));
            if score <= alpha {
                break;
            }
            beta = beta.min(score);
        }
        score
    }
}

impl Agent for MinimaxAgent {
    fn propose_move(&mut self, board: &Board) -> Result<Action> {
        // Every opening scores the same on an empty board, skip the search
        if board.is_empty() {
            let cells = board.empty_cells();
            return cells
                .choose(&mut self.rng)
                .copied()
                .ok_or(crate::Error::NoValidMoves);
        }

        let mut scored = self.score_moves(board);
        // Shuffle first so ties are broken uniformly instead of by position
        scored.shuffle(&mut self.rng);
        scored
            .iter()
            .fold(None, |best: Option<(Action, i32)>, &(action, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((action, score)),
            })
            .map(|(action, _)| action)
            .ok_or(crate::Error::NoValidMoves)
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
