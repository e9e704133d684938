//! Tabular Q-learning agent
//!
//! The agent learns from whole games: it plays a game to the end, then
//! pushes the terminal reward back through each of its own moves, last move
//! first, with a depth-dependent discount.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::{AgentConfig, DEFAULT_TEMPERATURE},
    ports::{Agent, request_legal_move},
    q_learning::q_table::QTable,
    tictactoe::{Action, Board, Player, StateKey},
    utils::{build_rng, exponential_weights, weighted_sample},
};

/// Result of one training game, seen from the mover at the top of the recursion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameUpdate {
    /// Terminal reward: +1 win, 0 draw, -1 loss
    pub reward: f64,
    /// Sum over the updated moves of `(old − new) / depth`
    pub mean_delta: f64,
    /// Moves made by the mover from here to the end of the game, plus one
    /// when the opponent's reply ended it (1 = this move ended the game).
    /// In self-play every ply is the mover's own, so this counts plies.
    pub depth: usize,
}

fn ensure_playable(board: &Board) -> Result<()> {
    if board.is_finished() {
        return Err(Error::BoardFinished {
            board: board.to_string(),
        });
    }
    Ok(())
}

/// Q-learning player
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    player: Player,
    q_table: QTable,
    temperature: f64,
    rng: StdRng,
    name: String,
}

impl QLearningAgent {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            q_table: QTable::new(),
            temperature: DEFAULT_TEMPERATURE,
            rng: build_rng(None),
            name: "Q-Learning".to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns error if the configuration does not validate.
    pub fn from_config(player: Player, config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            temperature: config.temperature,
            rng: build_rng(config.seed),
            ..Self::new(player)
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_q_table(mut self, q_table: QTable) -> Self {
        self.q_table = q_table;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Choose an action for the current grid.
    ///
    /// An unvisited state gets a 0.0 entry for every empty cell and a
    /// uniformly random answer. Otherwise `sample` draws from the
    /// exponential weighting of the stored values, and greedy mode picks
    /// uniformly among the actions sharing the best value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] on an unvisited full board.
    pub fn propose(&mut self, board: &Board, sample: bool) -> Result<Action> {
        let state = board.state_key();
        let known: Option<Vec<(Action, f64)>> = self
            .q_table
            .actions(&state)
            .map(|row| row.iter().map(|(&action, &value)| (action, value)).collect());

        let chosen = match known {
            None => {
                let actions = board.empty_cells();
                self.q_table.initialize(state, actions.iter().copied());
                actions.choose(&mut self.rng).copied()
            }
            Some(scored) if sample => {
                let values: Vec<f64> = scored.iter().map(|&(_, value)| value).collect();
                let items: Vec<(Action, f64)> = scored
                    .iter()
                    .map(|&(action, _)| action)
                    .zip(exponential_weights(&values, self.temperature))
                    .collect();
                weighted_sample(&mut self.rng, &items)
            }
            Some(scored) => {
                let best = scored
                    .iter()
                    .map(|&(_, value)| value)
                    .fold(f64::NEG_INFINITY, f64::max);
                let ties: Vec<Action> = scored
                    .iter()
                    .filter(|&&(_, value)| value == best)
                    .map(|&(action, _)| action)
                    .collect();
                ties.choose(&mut self.rng).copied()
            }
        };
        chosen.ok_or(Error::NoValidMoves)
    }

    /// Temporal-difference update of a visited `(state, action)` pair.
    /// Returns `old − new`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingQEntry`] if the pair was never initialized.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Result<f64> {
        self.q_table
            .update(state, action, reward, learning_rate, discount_factor)
    }

    /// Sample an action for `mover`, apply it and return the pre-move state.
    fn play_sampled(&mut self, board: &mut Board, mover: Player) -> Result<(StateKey, Action)> {
        ensure_playable(board)?;
        let state = board.state_key();
        let action = self.propose(board, true)?;
        if !board.place(action, mover) {
            return Err(Error::IllegalStoredAction {
                state: state.into_string(),
                action: action.to_string(),
            });
        }
        Ok((state, action))
    }

    /// Play the rest of a game against `opponent` and learn from it.
    ///
    /// It must be this agent's turn on `board`. After the game ends the
    /// reward is backed up through every move this agent made, using
    /// `discount(depth)`. Depth is 1 when this agent's move ends the game,
    /// 2 when the opponent's reply does, and one more per earlier move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardFinished`] if the board has no empty cell, and
    /// propagates errors from the opponent.
    pub fn train_one_game<F>(
        &mut self,
        learning_rate: f64,
        discount: &F,
        board: &mut Board,
        opponent: &mut dyn Agent,
    ) -> Result<GameUpdate>
    where
        F: Fn(usize) -> f64,
    {
        let (state, action) = self.play_sampled(board, self.player)?;

        let (reward, mut mean_delta, depth) = if board.is_winner(self.player) {
            (1.0, 0.0, 1)
        } else if board.is_finished() {
            (0.0, 0.0, 1)
        } else {
            request_legal_move(opponent, board)?;
            if board.is_winner(opponent.player()) {
                (-1.0, 0.0, 2)
            } else if board.is_finished() {
                (0.0, 0.0, 2)
            } else {
                let rest = self.train_one_game(learning_rate, discount, board, opponent)?;
                (rest.reward, rest.mean_delta, rest.depth + 1)
            }
        };

        let delta = self.update(&state, action, reward, learning_rate, discount(depth))?;
        mean_delta += delta / depth as f64;
        Ok(GameUpdate {
            reward,
            mean_delta,
            depth,
        })
    }

    /// Play the rest of a game against itself and learn from both sides.
    ///
    /// The agent starts as its own identity and alternates identities ply by
    /// ply. Each reply's reward is negated on the way back up, since what is
    /// good for one side is bad for the other. The returned reward is from
    /// this agent's own identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardFinished`] if the board has no empty cell.
    pub fn train_one_game_self_play<F>(
        &mut self,
        learning_rate: f64,
        discount: &F,
        board: &mut Board,
    ) -> Result<GameUpdate>
    where
        F: Fn(usize) -> f64,
    {
        self.self_play_step(self.player, learning_rate, discount, board)
    }

    fn self_play_step<F>(
        &mut self,
        mover: Player,
        learning_rate: f64,
        discount: &F,
        board: &mut Board,
    ) -> Result<GameUpdate>
    where
        F: Fn(usize) -> f64,
    {
        let (state, action) = self.play_sampled(board, mover)?;

        let (reward, mut mean_delta, depth) = if board.is_winner(mover) {
            (1.0, 0.0, 1)
        } else if board.is_finished() {
            (0.0, 0.0, 1)
        } else {
            let reply = self.self_play_step(mover.opponent(), learning_rate, discount, board)?;
            (-reply.reward, reply.mean_delta, reply.depth + 1)
        };

        let delta = self.update(&state, action, reward, learning_rate, discount(depth))?;
        mean_delta += delta / depth as f64;
        Ok(GameUpdate {
            reward,
            mean_delta,
            depth,
        })
    }
}

impl Agent for QLearningAgent {
    fn propose_move(&mut self, board: &Board) -> Result<Action> {
        self.propose(board, false)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{MinimaxAgent, RandomAgent};

    #[test]
    fn first_visit_initializes_every_empty_cell() {
        let board = Board::from_string("X.. .O. ...").unwrap();
        let mut agent = QLearningAgent::new(Player::X).with_seed(1);
        let action = agent.propose(&board, false).unwrap();

        assert_eq!(board.get(action), Some(crate::tictactoe::Cell::Empty));
        let row = agent.q_table().actions(&board.state_key()).unwrap();
        assert_eq!(row.len(), 7);
        assert!(row.values().all(|&v| v == 0.0));
    }

    #[test]
    fn greedy_picks_the_best_value() {
        let board = Board::default();
        let mut table = QTable::new();
        let state = board.state_key();
        table.initialize(state.clone(), board.empty_cells());
        table.set(state, Action::new(2, 1), 0.8);

        let mut agent = QLearningAgent::new(Player::X)
            .with_seed(4)
            .with_q_table(table);
        for _ in 0..20 {
            assert_eq!(agent.propose(&board, false).unwrap(), Action::new(2, 1));
        }
    }

    #[test]
    fn greedy_breaks_ties_among_best_only() {
        let board = Board::default();
        let mut table = QTable::new();
        let state = board.state_key();
        table.initialize(state.clone(), board.empty_cells());
        for cell in board.empty_cells() {
            table.set(state.clone(), cell, -1.0);
        }
        table.set(state.clone(), Action::new(0, 0), 0.5);
        table.set(state, Action::new(2, 2), 0.5);

        let mut agent = QLearningAgent::new(Player::X)
            .with_seed(11)
            .with_q_table(table);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(agent.propose(&board, false).unwrap());
        }
        let expected: std::collections::HashSet<_> =
            [Action::new(0, 0), Action::new(2, 2)].into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn sampling_keeps_every_action_reachable() {
        let board = Board::from_string("XO. ... ...").unwrap();
        let mut agent = QLearningAgent::new(Player::X)
            .with_seed(2)
            .with_temperature(1.0);
        agent.propose(&board, false).unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(agent.propose(&board, true).unwrap());
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn sampling_handles_extreme_values() {
        let board = Board::from_string("XO. ... ...").unwrap();
        let mut table = QTable::new();
        let state = board.state_key();
        table.initialize(state.clone(), board.empty_cells());
        table.set(state.clone(), Action::new(0, 2), 1e6);
        table.set(state, Action::new(1, 0), -1e6);

        let mut agent = QLearningAgent::new(Player::X)
            .with_seed(3)
            .with_q_table(table);
        for _ in 0..50 {
            assert_eq!(agent.propose(&board, true).unwrap(), Action::new(0, 2));
        }
    }

    #[test]
    fn winning_move_is_rewarded() {
        // (0, 2) completes the top row; (1, 2) would hand O the anti-diagonal
        let mut board = Board::from_string("XX. OO. OXO").unwrap();
        let before = board.state_key();
        let mut agent = QLearningAgent::new(Player::X).with_seed(8);
        let mut opponent = RandomAgent::new(Player::O).with_seed(8);

        // Prime the table so sampling all but always picks the winning cell
        agent.propose(&board, false).unwrap();
        let mut primed = agent.q_table().clone();
        primed.set(before.clone(), Action::new(0, 2), 10.0);
        agent = agent.with_q_table(primed);

        let update = agent
            .train_one_game(0.5, &|_| 0.9, &mut board, &mut opponent)
            .unwrap();
        assert_eq!(update.reward, 1.0);
        assert_eq!(update.depth, 1);
        assert!(board.is_winner(Player::X));
        // new = 0.5 * 10 + 0.5 * (1 + 0.9 * 10) = 10
        assert!((agent.q_table().value(&before, Action::new(0, 2)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn losing_move_ends_up_below_winning_moves() {
        // (0, 2) and (1, 2) both win at once; (2, 1) lets O take the top row
        let start = Board::from_string("OO. XX. X.O").unwrap();
        let state = start.state_key();
        let mut agent = QLearningAgent::new(Player::X).with_seed(21);
        let mut opponent = MinimaxAgent::new(Player::O).with_seed(21);

        for _ in 0..200 {
            let mut board = start.clone();
            agent
                .train_one_game(0.5, &|_| 0.9, &mut board, &mut opponent)
                .unwrap();
        }

        let best = agent.propose(&start, false).unwrap();
        assert!(best == Action::new(0, 2) || best == Action::new(1, 2));
        let table = agent.q_table();
        assert!(table.value(&state, Action::new(2, 1)) < table.value(&state, best));
    }

    #[test]
    fn full_board_is_rejected() {
        let mut board = Board::from_string("XOX XOO OXX").unwrap();
        let mut agent = QLearningAgent::new(Player::X);
        let mut opponent = RandomAgent::new(Player::O);
        assert!(matches!(
            agent.train_one_game(0.5, &|_| 0.9, &mut board, &mut opponent),
            Err(Error::BoardFinished { .. })
        ));
        assert!(matches!(
            agent.train_one_game_self_play(0.5, &|_| 0.9, &mut board),
            Err(Error::BoardFinished { .. })
        ));
        assert!(agent.q_table().is_empty());
    }

    #[test]
    fn self_play_updates_both_sides_and_restores_identity() {
        let mut agent = QLearningAgent::new(Player::X).with_seed(5);
        let mut board = Board::default();
        let update = agent
            .train_one_game_self_play(0.5, &|_| 0.9, &mut board)
            .unwrap();

        assert_eq!(agent.player(), Player::X);
        assert!(board.is_finished() || board.winner().is_some());
        // One update per ply, every ply is a fresh state
        assert_eq!(agent.q_table().state_count(), update.depth);
        let expected = match board.winner() {
            Some(Player::X) => 1.0,
            Some(Player::O) => -1.0,
            None => 0.0,
        };
        assert_eq!(update.reward, expected);
    }

    /// Always takes the first empty cell in row-major order
    struct FirstEmpty(Player);

    impl Agent for FirstEmpty {
        fn propose_move(&mut self, board: &Board) -> Result<Action> {
            board.empty_cells().first().copied().ok_or(Error::NoValidMoves)
        }

        fn set_player(&mut self, player: Player) {
            self.0 = player;
        }

        fn player(&self) -> Player {
            self.0
        }

        fn name(&self) -> &str {
            "first-empty"
        }
    }

    fn pieces(board: &Board, player: Player) -> usize {
        board
            .cells()
            .iter()
            .filter(|&&cell| cell == player.to_cell())
            .count()
    }

    #[test]
    fn depth_counts_learner_moves_when_the_learner_ends_the_game() {
        // Any two cells of a 2×2 board form a line, so X wins on its second move
        let mut board = Board::new(2).unwrap();
        let mut agent = QLearningAgent::new(Player::X).with_seed(13);
        let mut opponent = FirstEmpty(Player::O);
        let update = agent
            .train_one_game(0.3, &|_| 0.9, &mut board, &mut opponent)
            .unwrap();

        assert_eq!(board.winner(), Some(Player::X));
        assert_eq!(pieces(&board, Player::X), 2);
        assert_eq!(update.depth, 2);
    }

    #[test]
    fn depth_adds_one_when_the_opponent_ends_the_game() {
        let mut board = Board::from_string("X. ..").unwrap();
        let mut agent = QLearningAgent::new(Player::O).with_seed(13);
        let mut opponent = FirstEmpty(Player::X);
        let update = agent
            .train_one_game(0.3, &|_| 0.9, &mut board, &mut opponent)
            .unwrap();

        assert_eq!(board.winner(), Some(Player::X));
        assert_eq!(pieces(&board, Player::O), 1);
        assert_eq!(update.depth, 2);
        assert_eq!(update.reward, -1.0);
    }

    #[test]
    fn depth_follows_the_learners_moves_on_full_games() {
        for seed in 0..20 {
            let mut board = Board::default();
            let mut agent = QLearningAgent::new(Player::X).with_seed(seed);
            let mut opponent = FirstEmpty(Player::O);
            let update = agent
                .train_one_game(0.3, &|_| 0.9, &mut board, &mut opponent)
                .unwrap();

            // X moves last on a draw, so only an O win ends on the opponent's move
            let opponent_ended = usize::from(board.winner() == Some(Player::O));
            assert_eq!(
                update.depth,
                pieces(&board, Player::X) + opponent_ended,
                "seed {seed}"
            );
        }
    }

    #[test]
    fn sampling_follows_exponential_weights() {
        // A value gap of ln(2)/T makes the better cell twice as likely
        let board = Board::from_string("XOX OXO .X.").unwrap();
        let state = board.state_key();
        let mut table = QTable::new();
        table.initialize(state.clone(), board.empty_cells());
        table.set(state, Action::new(2, 2), 2f64.ln() / DEFAULT_TEMPERATURE);

        let mut agent = QLearningAgent::new(Player::O)
            .with_seed(17)
            .with_q_table(table);
        let draws = 6000;
        let better = (0..draws)
            .filter(|_| agent.propose(&board, true).unwrap() == Action::new(2, 2))
            .count();
        let share = better as f64 / draws as f64;
        assert!((share - 2.0 / 3.0).abs() < 0.03, "share {share}");
    }
}
