//! Platform-agnostic render grid.
//!
//! The grid is the only view collaborators get of a board. It is rebuilt
//! from scratch after every move, so it never drifts from the stored state.

use crate::board::Board;
use crate::position::Position;
use crate::types::Cell;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Label of an empty cell: a zero-width space, so the button keeps its size.
pub const BLANK_LABEL: &str = "\u{200b}";

/// Visual weight of a cell button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CellStyle {
    /// Open cell.
    Primary,
    /// Filled cell.
    Secondary,
    /// Cell on the winning line.
    Success,
}

/// Description of one rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct CellView {
    /// Action id sent back when the cell is clicked (`c0`..`c8`).
    action_id: String,
    /// Mark symbol, or [`BLANK_LABEL`].
    label: String,
    /// Cell is part of the winning line.
    emphasized: bool,
    /// Cell cannot be clicked.
    disabled: bool,
    /// Button style.
    style: CellStyle,
}

/// 3 rows of 3 cell views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGrid {
    rows: [[CellView; 3]; 3],
}

impl RenderGrid {
    /// Rows, top to bottom.
    pub fn rows(&self) -> &[[CellView; 3]; 3] {
        &self.rows
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &CellView> {
        self.rows.iter().flatten()
    }

    /// Cell view at `pos`.
    pub fn cell(&self, pos: Position) -> &CellView {
        &self.rows[pos.row()][pos.column()]
    }
}

/// Renders `board` into a grid.
///
/// Filled cells are always disabled; once the game is over every cell is.
#[instrument(skip(board))]
pub fn render(board: &Board) -> RenderGrid {
    let line = board.winning_line();
    let frozen = board.is_over();

    let view = |pos: Position| {
        let cell = board.get(pos);
        let emphasized = line.is_some_and(|line| line.contains(pos.to_index()));
        let (label, style) = match cell {
            Cell::Empty => (BLANK_LABEL, CellStyle::Primary),
            Cell::Marked(mark) if emphasized => (mark.symbol(), CellStyle::Success),
            Cell::Marked(mark) => (mark.symbol(), CellStyle::Secondary),
        };
        CellView::new(
            pos.action_id(),
            label.to_string(),
            emphasized,
            !cell.is_empty() || frozen,
            style,
        )
    };

    let rows = std::array::from_fn(|row| {
        std::array::from_fn(|col| view(Position::ALL[row * 3 + col]))
    });
    RenderGrid { rows }
}
