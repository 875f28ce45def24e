//! Tie detection logic for tic-tac-toe.

use super::win::winning_line;
use crate::types::{BOARD_SIZE, Cell};
use tracing::instrument;

/// Checks if every cell holds a mark.
#[instrument(skip(cells))]
pub fn is_full(cells: &[Cell; BOARD_SIZE]) -> bool {
    cells.iter().all(|cell| !cell.is_empty())
}

/// Checks if the game is a tie (full board, no line).
#[instrument(skip(cells))]
pub fn is_tie(cells: &[Cell; BOARD_SIZE]) -> bool {
    is_full(cells) && winning_line(cells).is_none()
}
