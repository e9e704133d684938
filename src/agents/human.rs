//! A person choosing moves at a terminal

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{Action, Board, Player},
};

/// Reads 1-based cell numbers (row-major, `1..=N²`) from `input`, prompting
/// on `output`. Unparseable or out-of-range answers are asked again;
/// occupied cells are left for the driver to reject.
pub struct HumanAgent<R, W> {
    player: Player,
    input: R,
    output: W,
    name: String,
}

impl HumanAgent<BufReader<Stdin>, Stdout> {
    /// Human playing through standard input and output
    pub fn stdio(player: Player) -> Self {
        Self::new(player, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(player: Player, input: R, output: W) -> Self {
        Self {
            player,
            input,
            output,
            name: "Human".to_string(),
        }
    }

    fn show(&mut self, board: &Board) -> Result<()> {
        writeln!(self.output, "\n{board}\n").map_err(|source| Error::Io {
            operation: "write board".to_string(),
            source,
        })
    }

    fn prompt(&mut self, cells: usize) -> Result<()> {
        write!(
            self.output,
            "Player {}, choose the cell (1-{cells}) to put your '{}': ",
            self.player.number(),
            self.player
        )
        .and_then(|_| self.output.flush())
        .map_err(|source| Error::Io {
            operation: "write move prompt".to_string(),
            source,
        })
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn propose_move(&mut self, board: &Board) -> Result<Action> {
        let size = board.size();
        let cells = size * size;
        self.show(board)?;
        loop {
            self.prompt(cells)?;
            let mut line = String::new();
            let read = self.input.read_line(&mut line).map_err(|source| Error::Io {
                operation: "read move".to_string(),
                source,
            })?;
            if read == 0 {
                return Err(Error::InputClosed);
            }
            if let Ok(cell) = line.trim().parse::<usize>()
                && (1..=cells).contains(&cell)
            {
                let index = cell - 1;
                return Ok(Action::new(index / size, index % size));
            }
        }
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
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_one_based_cells() {
        let input = Cursor::new("5\n");
        let mut agent = HumanAgent::new(Player::X, input, Vec::new());
        let action = agent.propose_move(&Board::default()).unwrap();
        assert_eq!(action, Action::new(1, 1));
    }

    #[test]
    fn reprompts_on_bad_input() {
        let input = Cursor::new("zero\n0\n10\n9\n");
        let mut output = Vec::new();
        let action = {
            let mut agent = HumanAgent::new(Player::O, input, &mut output);
            agent.propose_move(&Board::default()).unwrap()
        };
        assert_eq!(action, Action::new(2, 2));
        let prompts = String::from_utf8(output).unwrap();
        assert_eq!(prompts.matches("Player 2").count(), 4);
        assert!(prompts.contains("(1-9)"));
    }

    #[test]
    fn shows_the_board_once_per_move() {
        let board = Board::from_string("X.. .O. ...").unwrap();
        let mut output = Vec::new();
        {
            let mut agent = HumanAgent::new(Player::X, Cursor::new("x\n3\n"), &mut output);
            assert_eq!(agent.propose_move(&board).unwrap(), Action::new(0, 2));
        }
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("-+-+-").count(), 2);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut agent = HumanAgent::new(Player::X, Cursor::new(""), Vec::new());
        assert!(matches!(
            agent.propose_move(&Board::default()),
            Err(Error::InputClosed)
        ));
    }
}
