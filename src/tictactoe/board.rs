//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineSet;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' | '1' => Some(Cell::X),
            'O' | 'o' | '2' => Some(Cell::O),
            _ => None,
        }
    }

    /// Symbol used when rendering the board for people
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

/// One of the two player identities
///
/// `X` is player 1 and `O` is player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// 1 for the first player, 2 for the second
    pub fn number(self) -> u8 {
        match self {
            Player::X => 1,
            Player::O => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// A cell coordinate, `(row, col)` with zero-based indices
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Canonical key for a full grid: the cells flattened in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A legal placement together with the board it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub action: Action,
    pub board: Board,
}

/// Square N×N grid of cell owners.
///
/// Cells only ever go from `Empty` to occupied; [`Board::place`] refuses
/// anything else. Cloning gives a fully independent board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Standard 3×3 board
    pub const DEFAULT_SIZE: usize = 3;

    /// Create an empty board of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns error if `size` is zero.
    pub fn new(size: usize) -> Result<Self, crate::Error> {
        if size == 0 {
            return Err(crate::Error::InvalidBoardSize { size });
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Create a board from a string of `.`, `X` and `O` characters.
    ///
    /// Whitespace is ignored and the dimension is inferred from the number
    /// of cells, which must be a non-zero perfect square.
    ///
    /// # Errors
    ///
    /// Returns error if the cell count is not a square or a character is invalid.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let size = chars.len().isqrt();
        if size == 0 || size * size != chars.len() {
            return Err(crate::Error::InvalidBoardLength {
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let cells = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                    character: c,
                    position: i,
                    context: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { size, cells })
    }

    /// Board dimension N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, action: Action) -> Option<usize> {
        (action.row < self.size && action.col < self.size)
            .then(|| action.row * self.size + action.col)
    }

    /// Get the cell at an action's coordinate, `None` when out of range
    pub fn get(&self, action: Action) -> Option<Cell> {
        self.index(action).map(|idx| self.cells[idx])
    }

    /// Place `player` on an empty in-range cell.
    ///
    /// Returns `false` and leaves the board untouched when the coordinate is
    /// out of range or the cell is already occupied.
    pub fn place(&mut self, action: Action, player: Player) -> bool {
        match self.index(action) {
            Some(idx) if self.cells[idx] == Cell::Empty => {
                self.cells[idx] = player.to_cell();
                true
            }
            _ => false,
        }
    }

    /// Check if a player owns a full row, column or diagonal
    pub fn is_winner(&self, player: Player) -> bool {
        LineSet::new(self.size).has_won(&self.cells, player)
    }

    /// True when no empty cell remains. Says nothing about winners.
    pub fn is_finished(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// True when no cell has been played yet
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == Cell::Empty)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        [Player::X, Player::O]
            .into_iter()
            .find(|&player| self.is_winner(player))
    }

    /// All empty coordinates in row-major order
    pub fn empty_cells(&self) -> Vec<Action> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| Action::new(i / self.size, i % self.size))
            .collect()
    }

    /// Every placement available to `player`, row-major, each paired with
    /// an independent board that has the placement applied.
    pub fn candidates(&self, player: Player) -> Vec<Candidate> {
        self.empty_cells()
            .into_iter()
            .map(|action| {
                let mut board = self.clone();
                board.place(action, player);
                Candidate { action, board }
            })
            .collect()
    }

    /// Canonical hashable snapshot of the grid
    pub fn state_key(&self) -> StateKey {
        StateKey(self.cells.iter().map(|&c| c.to_char()).collect())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            cells: vec![Cell::Empty; Self::DEFAULT_SIZE * Self::DEFAULT_SIZE],
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = vec!["-"; self.size].join("+");
        for (row, chunk) in self.cells.chunks(self.size).enumerate() {
            if row > 0 {
                writeln!(f)?;
                writeln!(f, "{separator}")?;
            }
            let line: Vec<String> = chunk.iter().map(|c| c.symbol().to_string()).collect();
            write!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}
