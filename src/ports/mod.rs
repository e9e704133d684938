//! Ports (trait boundaries) between the game drivers and player implementations.

pub mod agent;

pub use agent::{Agent, request_legal_move};
