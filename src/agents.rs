//! Player implementations: perfect search, uniform random and human input

pub mod human;
pub mod minimax;
pub mod random;

pub use human::HumanAgent;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;
