//! Errors raised while playing a board.

use crate::position::Position;
use crate::types::BoardKey;

/// Error that can occur when validating or applying a move.
///
/// Every variant is detected before the board is touched, so a rejected move
/// never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game already has a winner or a full board.
    #[display("This game is already over")]
    GameOver,

    /// The targeted cell already holds a mark.
    #[display("Move is already taken ({})", _0)]
    CellOccupied(Position),

    /// The acting user also made the previous move.
    #[display("It's not your turn")]
    NotYourTurn,

    /// Both seats are taken by other users.
    #[display("Who are you and why are you clicking these buttons?!?")]
    UnauthorizedPlayer,

    /// The button action id does not name a cell.
    #[display("Unknown cell {:?}", _0)]
    InvalidCell(String),
}

impl std::error::Error for MoveError {}

/// Error returned by store-level operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// No board is stored under the key.
    #[display("Game {} not found, it may have expired", _0)]
    GameNotFound(BoardKey),

    /// The board rejected the move.
    #[display("{}", _0)]
    Move(MoveError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::GameNotFound(_) => None,
            GameError::Move(err) => Some(err),
        }
    }
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        GameError::Move(err)
    }
}
