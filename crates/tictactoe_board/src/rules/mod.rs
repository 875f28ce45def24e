//! Game rules for tic-tac-toe.
//!
//! Pure functions over the cell array. Rules are kept apart from
//! [`Board`](crate::Board) so they can be checked against hand-built cell
//! layouts as well as boards reached through play.

pub mod draw;
pub mod win;

pub use draw::{is_full, is_tie};
pub use win::{LINES, WinningLine, winning_line};
