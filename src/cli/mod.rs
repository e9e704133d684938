//! Command-line interface: play, train and evaluate
//!
//! The binary is a thin dispatcher; each subcommand lives in
//! [`commands`] with its own clap arguments and `execute` entry point.

pub mod commands;
pub mod output;
pub mod players;
