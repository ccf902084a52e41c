//! Board State Container
//!
//! Process-local state: the board list and the active board. Optimistic
//! updates and authoritative snapshots both go through here; subscribers
//! get notified on every change.

use tokio::sync::watch;

use crate::models::{Board, BoardId, BoardSummary};

/// Global client state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardState {
    /// All boards, in store order
    pub boards: Vec<BoardSummary>,
    /// Board currently shown; `None` until the first load completes
    pub active: Option<Board>,
}

impl BoardState {
    pub fn active_id(&self) -> Option<BoardId> {
        self.active.as_ref().map(|b| b.id)
    }
}

/// Shared handle to the state; clones observe the same state
#[derive(Clone, Debug)]
pub struct BoardStore {
    tx: watch::Sender<BoardState>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BoardState::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    pub fn active_board(&self) -> Option<Board> {
        self.tx.borrow().active.clone()
    }

    pub fn active_id(&self) -> Option<BoardId> {
        self.tx.borrow().active_id()
    }

    /// Authoritative replace; returns the local board it overwrote
    pub fn replace_active(&self, board: Option<Board>) -> Option<Board> {
        let mut previous = None;
        self.tx.send_modify(|state| {
            previous = std::mem::replace(&mut state.active, board);
            if let Some(active) = &state.active {
                // Keep the list entry in step with the board name
                if let Some(entry) = state.boards.iter_mut().find(|b| b.id == active.id) {
                    entry.name = active.name.clone();
                }
            }
        });
        previous
    }

    pub fn set_boards(&self, boards: Vec<BoardSummary>) {
        self.tx.send_modify(|state| state.boards = boards);
    }

    /// Optimistic update of the active board. Subscribers are only woken when
    /// the board actually changed; returns the new board in that case.
    pub fn apply<F>(&self, f: F) -> Option<Board>
    where
        F: FnOnce(&Board) -> Board,
    {
        let mut updated = None;
        self.tx.send_if_modified(|state| {
            let Some(current) = state.active.as_ref() else {
                return false;
            };
            let next = f(current);
            if &next == current {
                return false;
            }
            updated = Some(next.clone());
            state.active = Some(next);
            true
        });
        updated
    }

    /// Rename a board in the list and, if active, on the board itself
    pub fn rename_board(&self, id: BoardId, name: &str) {
        self.tx.send_modify(|state| {
            if let Some(entry) = state.boards.iter_mut().find(|b| b.id == id) {
                entry.name = name.to_string();
            }
            if let Some(active) = state.active.as_mut().filter(|b| b.id == id) {
                active.name = name.to_string();
            }
        });
    }
}
