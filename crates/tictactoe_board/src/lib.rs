//! Tic-tac-toe engine for games played through chat message buttons.
//!
//! # Architecture
//!
//! - **Board**: cells, lazily claimed seats and the move state machine
//! - **Rules**: win and tie detection over the raw cell array
//! - **Render**: deterministic 3x3 grid of button descriptions
//! - **Store**: keyed table of live boards, one lock per board
//!
//! # Example
//!
//! ```
//! use tictactoe_board::{BoardStore, Board, Outcome};
//!
//! let store = BoardStore::new();
//! store.save("message-1", Board::new());
//!
//! let report = store.play("message-1", "alice", "c4")?;
//! assert_eq!(report.outcome(), &Outcome::Continue);
//! # Ok::<(), tictactoe_board::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod position;
mod render;
pub mod rules;
mod store;
mod types;

pub use board::Board;
pub use error::{GameError, MoveError};
pub use position::{ACTION_PREFIX, Position};
pub use render::{BLANK_LABEL, CellStyle, CellView, RenderGrid, render};
pub use rules::WinningLine;
pub use store::{BoardHandle, BoardStore, MoveReport};
pub use types::{BOARD_SIZE, BoardKey, Cell, Mark, Outcome, UserId};
