//! Win detection logic for tic-tac-toe.

use crate::types::{BOARD_SIZE, Cell, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The 8 lines of the board: rows, then columns, then diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Three cells holding the same mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine {
    /// Mark filling the line.
    pub mark: Mark,
    /// Indices of the line, ascending.
    pub cells: [usize; 3],
}

impl WinningLine {
    /// Returns true if `index` lies on this line.
    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }
}

/// Finds the first completed line, scanning rows, columns, then diagonals.
///
/// Returns `None` if no line holds three equal marks.
#[instrument(skip(cells))]
pub fn winning_line(cells: &[Cell; BOARD_SIZE]) -> Option<WinningLine> {
    LINES.iter().find_map(|&[a, b, c]| {
        let mark = cells[a].mark()?;
        (cells[b] == cells[a] && cells[c] == cells[a]).then_some(WinningLine {
            mark,
            cells: [a, b, c],
        })
    })
}
