//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a chat user (a Discord snowflake in practice).
pub type UserId = String;

/// Key a board is stored under (the id of the message it is rendered into).
pub type BoardKey = String;

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 9;

/// Mark placed by a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Mark {
    /// Mark of player one (moves first).
    X,
    /// Mark of player two.
    O,
}

impl Mark {
    /// Symbol shown on a button holding this mark.
    pub fn symbol(self) -> &'static str {
        match self {
            Mark::X => "❌",
            Mark::O => "⭕",
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Cell holds a player's mark.
    Marked(Mark),
}

impl Cell {
    /// Returns true for an unplayed cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the mark held by this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Game goes on.
    Continue,
    /// Game ended with this user completing a line.
    Winner(UserId),
    /// Board filled without a winner.
    Tie,
}

impl Outcome {
    /// Returns true once no further moves are possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Continue => write!(f, "Continue"),
            Outcome::Winner(user) => write!(f, "{} wins", user),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}
