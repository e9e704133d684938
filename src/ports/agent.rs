//! Agent port - the capability every player kind implements
//!
//! The match and training drivers only ever talk to players through this
//! trait, so search agents, learners, random baselines and people at a
//! terminal are interchangeable.

use tracing::warn;

use crate::{
    Result,
    tictactoe::{Action, Board, Player},
};

/// Agent trait - unified interface for every kind of player
///
/// # Examples
///
/// ```no_run
/// use noughts::{
///     agents::{MinimaxAgent, RandomAgent},
///     pipeline::run_match,
///     tictactoe::Player,
/// };
///
/// let mut minimax = MinimaxAgent::new(Player::X);
/// let mut random = RandomAgent::new(Player::O);
/// let tally = run_match(&mut minimax, &mut random, 10, 3)?;
/// assert_eq!(tally.total(), 10);
/// # Ok::<(), noughts::Error>(())
/// ```
pub trait Agent {
    /// Propose a cell for the agent's next placement.
    ///
    /// The board is always a copy of the live game. The proposal does not
    /// have to be legal; drivers ask again until it is.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent cannot produce any proposal, for
    /// example when its input source is exhausted.
    fn propose_move(&mut self, board: &Board) -> Result<Action>;

    /// Reassign which identity this agent plays as.
    fn set_player(&mut self, player: Player);

    /// The identity this agent currently plays as.
    fn player(&self) -> Player;

    /// Human-readable name used in logs and reports.
    fn name(&self) -> &str;
}

/// Ask `agent` for moves against copies of `board` until one is legal, then
/// apply it for the agent's identity.
///
/// # Errors
///
/// Propagates errors from [`Agent::propose_move`].
pub fn request_legal_move(agent: &mut dyn Agent, board: &mut Board) -> Result<Action> {
    loop {
        let snapshot = board.clone();
        let action = agent.propose_move(&snapshot)?;
        if board.place(action, agent.player()) {
            return Ok(action);
        }
        warn!(
            agent = agent.name(),
            row = action.row,
            col = action.col,
            "rejected illegal move proposal"
        );
    }
}
