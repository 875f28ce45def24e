//! Board state and the move state machine.

use crate::error::MoveError;
use crate::position::Position;
use crate::rules::{self, WinningLine};
use crate::types::{BOARD_SIZE, Cell, Mark, Outcome, UserId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Complete state of one game.
///
/// Seats are claimed lazily: whoever moves first becomes player one (X),
/// the first different user to move becomes player two (O).
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; BOARD_SIZE],
    /// User playing X, once they have moved.
    player1: Option<UserId>,
    /// User playing O, once they have moved.
    player2: Option<UserId>,
    /// User who made the most recent move.
    last_player: Option<UserId>,
}

impl Board {
    /// Creates an empty board with both seats open.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Returns the user seated with `mark`, if claimed.
    pub fn player(&self, mark: Mark) -> Option<&str> {
        match mark {
            Mark::X => self.player1.as_deref(),
            Mark::O => self.player2.as_deref(),
        }
    }

    /// Returns the mark `user` plays with, if they hold a seat.
    pub fn mark_of(&self, user: &str) -> Option<Mark> {
        if self.player1.as_deref() == Some(user) {
            Some(Mark::X)
        } else if self.player2.as_deref() == Some(user) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Returns the completed line, if any.
    pub fn winning_line(&self) -> Option<WinningLine> {
        rules::winning_line(&self.cells)
    }

    /// Returns the winning user together with the cells of their line.
    pub fn winner(&self) -> Option<(UserId, WinningLine)> {
        let line = self.winning_line()?;
        self.player(line.mark).map(|user| (user.to_string(), line))
    }

    /// Evaluates the current state without changing it.
    pub fn outcome(&self) -> Outcome {
        if let Some((user, _)) = self.winner() {
            Outcome::Winner(user)
        } else if rules::is_tie(&self.cells) {
            Outcome::Tie
        } else {
            Outcome::Continue
        }
    }

    /// Returns true once the board has a line or no empty cells.
    pub fn is_over(&self) -> bool {
        self.winning_line().is_some() || rules::is_full(&self.cells)
    }

    /// Plays `user`'s mark at `position`.
    ///
    /// Checks run in order, each with its own error: cell empty, user did not
    /// make the previous move, user holds or can claim a seat, game not over.
    /// The board is only modified once every check has passed, so a won or
    /// tied board never changes.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::CellOccupied`], [`MoveError::NotYourTurn`],
    /// [`MoveError::UnauthorizedPlayer`] or [`MoveError::GameOver`].
    #[instrument(skip(self), fields(position = %position))]
    pub fn apply_move(&mut self, user: &str, position: Position) -> Result<Outcome, MoveError> {
        let index = position.to_index();
        if !self.cells[index].is_empty() {
            debug!("Cell already taken");
            return Err(MoveError::CellOccupied(position));
        }

        if self.last_player.as_deref() == Some(user) {
            debug!("Same user tried to move twice in a row");
            return Err(MoveError::NotYourTurn);
        }

        let mark = self.seat_mark(user)?;

        if self.is_over() {
            warn!("Move attempted on a finished game");
            return Err(MoveError::GameOver);
        }

        let seat = match mark {
            Mark::X => &mut self.player1,
            Mark::O => &mut self.player2,
        };
        if seat.is_none() {
            info!(mark = %mark, "Seat claimed");
            *seat = Some(user.to_string());
        }

        self.last_player = Some(user.to_string());
        self.cells[index] = Cell::Marked(mark);

        let outcome = self.outcome();
        debug!(mark = %mark, outcome = %outcome, "Move applied\n{}", self);
        Ok(outcome)
    }

    /// Parses a button action id (`c0`..`c8`) and plays it.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidCell`] for a malformed id, otherwise the
    /// errors of [`Board::apply_move`].
    #[instrument(skip(self))]
    pub fn apply_action(&mut self, user: &str, action_id: &str) -> Result<Outcome, MoveError> {
        let position = Position::from_action_id(action_id)?;
        self.apply_move(user, position)
    }

    /// Mark `user` would play with, claiming an open seat if needed.
    fn seat_mark(&self, user: &str) -> Result<Mark, MoveError> {
        if let Some(mark) = self.mark_of(user) {
            return Ok(mark);
        }
        match (&self.player1, &self.player2) {
            (None, _) => Ok(Mark::X),
            (Some(_), None) => Ok(Mark::O),
            (Some(_), Some(_)) => {
                warn!("Third user tried to join a full game");
                Err(MoveError::UnauthorizedPlayer)
            }
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.cells[pos] {
                    Cell::Empty => write!(f, "{}", pos)?,
                    Cell::Marked(mark) => write!(f, "{}", mark)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}
