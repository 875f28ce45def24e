//! Board positions and their button action ids.

use crate::error::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Prefix of every cell button's action id (`c0` .. `c8`).
pub const ACTION_PREFIX: char = 'c';

/// A position on the tic-tac-toe board (0-8, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        match self {
            Position::TopLeft => 0,
            Position::TopCenter => 1,
            Position::TopRight => 2,
            Position::MiddleLeft => 3,
            Position::Center => 4,
            Position::MiddleRight => 5,
            Position::BottomLeft => 6,
            Position::BottomCenter => 7,
            Position::BottomRight => 8,
        }
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row (0-2) of this position.
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column (0-2) of this position.
    pub fn column(self) -> usize {
        self.to_index() % 3
    }

    /// Action id of the button rendered for this position.
    pub fn action_id(self) -> String {
        format!("{}{}", ACTION_PREFIX, self.to_index())
    }

    /// Parses a button action id such as `c4`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidCell`] unless the id is the prefix followed
    /// by a decimal index in `0..=8`.
    #[instrument]
    pub fn from_action_id(action_id: &str) -> Result<Self, MoveError> {
        action_id
            .strip_prefix(ACTION_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok())
            .and_then(Self::from_index)
            .ok_or_else(|| MoveError::InvalidCell(action_id.to_string()))
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_index_round_trip_matches_all() {
        for (i, pos) in Position::iter().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(Position::from_index(i), Some(pos));
        }
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_action_id_format() {
        assert_eq!(Position::TopLeft.action_id(), "c0");
        assert_eq!(Position::Center.action_id(), "c4");
        assert_eq!(Position::BottomRight.action_id(), "c8");
    }

    #[test]
    fn test_parse_action_id() {
        assert_eq!(Position::from_action_id("c0"), Ok(Position::TopLeft));
        assert_eq!(Position::from_action_id("c7"), Ok(Position::BottomCenter));
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        for bad in ["", "c", "c9", "c10", "x4", "4", "c-1", "c+1", "C4", "c 4"] {
            assert_eq!(
                Position::from_action_id(bad),
                Err(MoveError::InvalidCell(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_row_and_column() {
        assert_eq!((Position::MiddleRight.row(), Position::MiddleRight.column()), (1, 2));
        assert_eq!((Position::BottomLeft.row(), Position::BottomLeft.column()), (2, 0));
    }
}
