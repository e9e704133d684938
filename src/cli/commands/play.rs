//! Play command - Run games between any two kinds of player

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        output::{print_section, print_tally},
        players::{PlayerKind, build_agent},
    },
    pipeline::{MatchTally, play_game},
    tictactoe::{Board, GameOutcome, Player},
};

/// Games up to this count are printed one by one
const VERBOSE_GAME_LIMIT: usize = 10;

#[derive(Parser, Debug)]
#[command(about = "Play games between two players")]
pub struct PlayArgs {
    /// Player 1 (X, moves first)
    #[arg(long, value_enum, default_value = "human")]
    pub player1: PlayerKind,

    /// Player 2 (O)
    #[arg(long, value_enum, default_value = "minimax")]
    pub player2: PlayerKind,

    /// Saved Q-table used by any qlearner player
    #[arg(long)]
    pub qtable: Option<PathBuf>,

    /// Number of games
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Board dimension N
    #[arg(long, default_value_t = Board::DEFAULT_SIZE)]
    pub board_size: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let qtable = args.qtable.as_deref();
    let mut player1 = build_agent(args.player1, Player::X, qtable, args.seed)?;
    let mut player2 = build_agent(
        args.player2,
        Player::O,
        qtable,
        args.seed.map(|s| s.wrapping_add(1)),
    )?;

    let mut tally = MatchTally::default();
    for game in 0..args.games {
        let record = play_game(
            player1.as_mut(),
            player2.as_mut(),
            Board::new(args.board_size)?,
        )?;
        tally.record(record.outcome);

        if args.games <= VERBOSE_GAME_LIMIT {
            if args.games > 1 {
                println!("\nGame {}", game + 1);
            }
            match record.outcome {
                GameOutcome::Draw => println!("It's a draw"),
                GameOutcome::Win(winner) => println!("Player {} wins!", winner.number()),
            }
            println!("Board:\n{}", record.board);
        }
    }

    if args.games > 1 {
        print_section("Results");
        print_tally(&tally, args.player1.label(), args.player2.label());
    }
    Ok(())
}
