//! In-memory board store.
//!
//! Boards are keyed by the id of the message they are rendered into. The
//! store is an explicit object, built once and cloned into each handler.
//! Each board sits behind its own lock so two clicks on the same message are
//! applied one after the other.

use crate::board::Board;
use crate::error::GameError;
use crate::render::{RenderGrid, render};
use crate::types::{BoardKey, Outcome};
use derive_getters::Getters;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Result of a move accepted through the store.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveReport {
    /// Outcome of the move.
    outcome: Outcome,
    /// Board rendered right after the move.
    grid: RenderGrid,
}

/// Shared handle to one stored board.
#[derive(Debug, Clone, Default)]
pub struct BoardHandle {
    board: Arc<Mutex<Board>>,
}

impl BoardHandle {
    /// Wraps a board in a fresh handle.
    pub fn new(board: Board) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies the current board.
    pub fn snapshot(&self) -> Board {
        self.lock().clone()
    }

    /// Applies a move and renders the result while holding the board lock.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Move`] when the board rejects the move.
    #[instrument(skip(self))]
    pub fn play(&self, user: &str, action_id: &str) -> Result<MoveReport, GameError> {
        let mut board = self.lock();
        let outcome = board.apply_action(user, action_id)?;
        Ok(MoveReport {
            outcome,
            grid: render(&board),
        })
    }
}

/// Process-wide table of live boards.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    boards: Arc<Mutex<HashMap<BoardKey, BoardHandle>>>,
}

impl BoardStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating board store");
        Self::default()
    }

    fn boards(&self) -> MutexGuard<'_, HashMap<BoardKey, BoardHandle>> {
        self.boards.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the board stored under `key`.
    #[instrument(skip(self))]
    pub fn get(&self, key: &str) -> Option<Board> {
        self.handle(key).map(|handle| handle.snapshot())
    }

    /// Stores `board` under `key`, replacing whatever was there.
    #[instrument(skip(self, board))]
    pub fn save(&self, key: impl Into<BoardKey> + std::fmt::Debug, board: Board) {
        self.save_handle(key, BoardHandle::new(board));
    }

    /// Returns the shared handle for `key`.
    #[instrument(skip(self))]
    pub fn handle(&self, key: &str) -> Option<BoardHandle> {
        let handle = self.boards().get(key).cloned();
        if handle.is_none() {
            debug!("Board not found");
        }
        handle
    }

    /// Stores an existing handle under `key`.
    #[instrument(skip(self, handle))]
    pub fn save_handle(&self, key: impl Into<BoardKey> + std::fmt::Debug, handle: BoardHandle) {
        let key = key.into();
        if self.boards().insert(key.clone(), handle).is_some() {
            debug!(board_key = %key, "Board overwritten");
        } else {
            debug!(board_key = %key, "Board saved");
        }
    }

    /// Re-saves the board under `old` as `new`.
    ///
    /// The old key stays valid for any holder of the handle but is dropped
    /// from the table, since the message it named has been replaced.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameNotFound`] if nothing is stored under `old`.
    #[instrument(skip(self))]
    pub fn rekey(&self, old: &str, new: &str) -> Result<(), GameError> {
        let mut boards = self.boards();
        let handle = boards.remove(old).ok_or_else(|| {
            warn!("Cannot re-key a board that does not exist");
            GameError::GameNotFound(old.to_string())
        })?;
        boards.insert(new.to_string(), handle);
        info!("Board re-keyed");
        Ok(())
    }

    /// Plays `action_id` for `user` on the board stored under `key`.
    ///
    /// The table lock is released before the move runs; only the board's own
    /// lock is held while validating, mutating and rendering.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameNotFound`] for an unknown key and
    /// [`GameError::Move`] for a rejected move.
    #[instrument(skip(self))]
    pub fn play(&self, key: &str, user: &str, action_id: &str) -> Result<MoveReport, GameError> {
        let handle = self
            .handle(key)
            .ok_or_else(|| GameError::GameNotFound(key.to_string()))?;
        let report = handle.play(user, action_id)?;
        info!(outcome = %report.outcome, "Move accepted");
        Ok(report)
    }

    /// Number of stored boards.
    pub fn len(&self) -> usize {
        self.boards().len()
    }

    /// Returns true if no boards are stored.
    pub fn is_empty(&self) -> bool {
        self.boards().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::position::Position;

    #[test]
    fn test_get_unknown_key() {
        let store = BoardStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let store = BoardStore::new();
        store.save("m1", Board::new());
        let mut played = Board::new();
        played.apply_move("u1", Position::Center).ok();
        store.save("m1", played.clone());
        assert_eq!(store.get("m1"), Some(played));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_returns_snapshot() {
        let store = BoardStore::new();
        store.save("m1", Board::new());
        let mut copy = store.get("m1").unwrap_or_default();
        copy.apply_move("u1", Position::Center).ok();
        assert_eq!(store.get("m1"), Some(Board::new()));
    }

    #[test]
    fn test_play_unknown_key() {
        let store = BoardStore::new();
        assert_eq!(
            store.play("nope", "u1", "c0"),
            Err(GameError::GameNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_play_mutates_stored_board() {
        let store = BoardStore::new();
        store.save("m1", Board::new());
        let report = store.play("m1", "u1", "c4").expect("move accepted");
        assert_eq!(report.outcome(), &Outcome::Continue);
        assert_eq!(report.grid().cell(Position::Center).label(), "❌");
        let board = store.get("m1").expect("board stored");
        assert_eq!(board.player1().as_deref(), Some("u1"));
    }

    #[test]
    fn test_rejected_move_keeps_state() {
        let store = BoardStore::new();
        store.save("m1", Board::new());
        store.play("m1", "u1", "c4").expect("move accepted");
        let before = store.get("m1");
        assert!(store.play("m1", "u1", "c0").is_err());
        assert_eq!(store.get("m1"), before);
    }

    #[test]
    fn test_rekey_moves_same_board() {
        let store = BoardStore::new();
        store.save("old", Board::new());
        let handle = store.handle("old").expect("board stored");
        store.rekey("old", "new").expect("rekey");
        assert!(store.get("old").is_none());
        handle.play("u1", "c0").expect("move accepted");
        let board = store.get("new").expect("board stored");
        assert_eq!(board.last_player().as_deref(), Some("u1"));
    }

    #[test]
    fn test_rekey_unknown() {
        let store = BoardStore::new();
        assert!(matches!(
            store.rekey("a", "b"),
            Err(GameError::GameNotFound(key)) if key == "a"
        ));
    }

    #[test]
    fn test_concurrent_clicks_on_one_cell() {
        let store = BoardStore::new();
        store.save("m1", Board::new());
        let users: Vec<String> = (0..8).map(|n| format!("u{}", n)).collect();

        let results: Vec<_> = std::thread::scope(|scope| {
            let workers: Vec<_> = users
                .iter()
                .map(|user| {
                    let store = store.clone();
                    scope.spawn(move || store.play("m1", user, "c4"))
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().expect("worker finished"))
                .collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for result in results.iter().filter(|r| r.is_err()) {
            assert_eq!(
                result,
                &Err(GameError::Move(MoveError::CellOccupied(Position::Center)))
            );
        }

        let board = store.get("m1").expect("board stored");
        assert_eq!(board.cells().iter().filter(|c| !c.is_empty()).count(), 1);
        assert!(board.player1().is_some());
        assert_eq!(board.player2(), &None);
    }

    #[test]
    fn test_clones_share_table() {
        let store = BoardStore::new();
        let other = store.clone();
        other.save("m1", Board::new());
        assert!(store.get("m1").is_some());
    }
}
