//! Winning line analysis for N×N boards
//!
//! A line is a full row, a full column, the full main diagonal or the full
//! anti-diagonal. There are no shorter K-in-a-row segments: on a 4×4 board a
//! player needs all four cells of a line.

use super::{Cell, Player};

/// The 2N + 2 winning lines of an N×N board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSet {
    size: usize,
}

impl LineSet {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Check if a player owns at least one complete line
    pub fn has_won(&self, cells: &[Cell], player: Player) -> bool {
        let n = self.size;
        let target = player.to_cell();
        let owns = |idx: usize| cells[idx] == target;

        (0..n).any(|row| (0..n).all(|col| owns(row * n + col)))
            || (0..n).any(|col| (0..n).all(|row| owns(row * n + col)))
            || (0..n).all(|i| owns(i * n + i))
            || (0..n).all(|i| owns((n - 1 - i) * n + i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells_from(s: &str) -> Vec<Cell> {
        s.chars().filter_map(Cell::from_char).collect()
    }

    const THREE_BY_THREE_LINES: [[usize; 3]; 8] = [
        [0, 1, 2],
        [3, 4, 5],
        [6, 7, 8],
        [0, 3, 6],
        [1, 4, 7],
        [2, 5, 8],
        [0, 4, 8],
        [6, 4, 2],
    ];

    #[test]
    fn test_has_won_on_every_line() {
        let set = LineSet::new(3);
        for line in THREE_BY_THREE_LINES {
            let mut cells = vec![Cell::Empty; 9];
            for idx in &line {
                cells[*idx] = Cell::O;
            }
            assert!(set.has_won(&cells, Player::O), "line {line:?}");
            assert!(!set.has_won(&cells, Player::X));
        }
    }

    #[test]
    fn test_no_win_on_mixed_lines() {
        let set = LineSet::new(3);
        let cells = cells_from("XOXXOOOXX");
        assert!(!set.has_won(&cells, Player::X));
        assert!(!set.has_won(&cells, Player::O));
    }

    #[test]
    fn test_single_cell_board() {
        let set = LineSet::new(1);
        assert!(set.has_won(&[Cell::X], Player::X));
        assert!(!set.has_won(&[Cell::Empty], Player::X));
    }
}
