//! Persistence Gateway
//!
//! Applies intents optimistically to the local store and pushes the full
//! column list of the active board to the repository after every change.
//! Writes are fire-and-forget: failures are logged, never retried, and local
//! state stays authoritative until the next read replaces it. A single writer
//! task sends them to the store in dispatch order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use kanban_store::{BoardRepository, DomainError};

use crate::intent::Intent;
use crate::models::{normalize_name, Board, BoardId, Column, ColumnId, TaskId};
use crate::reducer::Reducer;
use crate::store::BoardStore;


#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("No active board")]
    NoActiveBoard,
    #[error(transparent)]
    Store(#[from] DomainError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// How a completion toggle reaches the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TogglePersistence {
    /// Only the full column overwrite
    #[default]
    FullOverwrite,
    /// Narrow flag patch first, then the full overwrite, from the same task
    NarrowThenFull,
}

/// Holds the default-board creation flag; released on drop, including when
/// the surrounding `load` future is cancelled
struct CreatingGuard<'a>(&'a AtomicBool);

impl<'a> CreatingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for CreatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One queued save of a board's columns
struct PendingWrite {
    board_id: BoardId,
    columns: Vec<Column>,
    narrow: Option<(ColumnId, TaskId, bool)>,
    intent: &'static str,
    done: oneshot::Sender<()>,
}

impl PendingWrite {
    async fn persist(self, repo: &dyn BoardRepository) {
        let id = self.board_id;

        if let Some((column_id, task_id, completed)) = &self.narrow {
            if let Err(e) = repo
                .toggle_task_completed(id, column_id, task_id, *completed)
                .await
            {
                log::warn!("Failed to patch task {} on board {}: {}", task_id, id, e);
            }
        }

        if let Err(e) = repo.set_columns(id, &self.columns).await {
            log::warn!("Failed to save board {} after {}: {}", id, self.intent, e);
        }

        let _ = self.done.send(());
    }
}

async fn run_writer(
    repo: Arc<dyn BoardRepository>,
    mut rx: mpsc::UnboundedReceiver<PendingWrite>,
) {
    while let Some(write) = rx.recv().await {
        write.persist(repo.as_ref()).await;
    }
    log::debug!("Board writer stopped");
}

#[derive(Clone)]
pub struct BoardGateway {
    repo: Arc<dyn BoardRepository>,
    store: BoardStore,
    reducer: Reducer,
    toggle_persistence: TogglePersistence,
    creating_default: Arc<AtomicBool>,
    writer: Arc<OnceLock<mpsc::UnboundedSender<PendingWrite>>>,
}

impl BoardGateway {
    pub fn new(repo: Arc<dyn BoardRepository>) -> Self {
        Self {
            repo,
            store: BoardStore::new(),
            reducer: Reducer::default(),
            toggle_persistence: TogglePersistence::default(),
            creating_default: Arc::new(AtomicBool::new(false)),
            writer: Arc::new(OnceLock::new()),
        }
    }

    pub fn with_reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_toggle_persistence(mut self, mode: TogglePersistence) -> Self {
        self.toggle_persistence = mode;
        self
    }

    pub fn with_store(mut self, store: BoardStore) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Read the board list and a board (the first one when `id` is `None` or
    /// unknown) and make it the active board.
    ///
    /// When the store holds no board at all, the default board is created.
    /// Only one creation request is in flight at a time; a load that finds
    /// another one running returns `Ok(None)` and leaves local state alone.
    pub async fn load(&self, id: Option<BoardId>) -> GatewayResult<Option<Board>> {
        self.store.set_boards(self.repo.list_boards().await?);

        let mut board = self.repo.get_board(id).await?;
        if board.is_none() {
            let Some(created) = self.ensure_default().await? else {
                return Ok(None);
            };
            self.store.set_boards(self.repo.list_boards().await?);
            board = self.repo.get_board(Some(created)).await?;
        }

        self.reconcile(board.clone());
        Ok(board)
    }

    async fn ensure_default(&self) -> GatewayResult<Option<BoardId>> {
        let Some(_guard) = CreatingGuard::acquire(&self.creating_default) else {
            log::debug!("Default board creation already in flight");
            return Ok(None);
        };

        let id = self.repo.ensure_default_board().await?;
        log::info!("Created default board {}", id);
        Ok(Some(id))
    }

    /// Reload the active board (or the first board) from the store
    pub async fn refresh(&self) -> GatewayResult<Option<Board>> {
        self.load(self.store.active_id()).await
    }

    /// Replace local state with an authoritative snapshot. Local edits not
    /// yet reflected in the snapshot are lost.
    pub fn reconcile(&self, snapshot: Option<Board>) {
        let snapshot = snapshot.map(Board::normalized);
        let previous = self.store.replace_active(snapshot.clone());

        if let (Some(previous), Some(snapshot)) = (previous, snapshot.as_ref()) {
            if previous.id == snapshot.id && &previous != snapshot {
                log::debug!("Board {} snapshot replaced unsaved local state", snapshot.id);
            }
        }
    }

    /// Apply an intent to the active board and persist the result.
    ///
    /// Returns a handle that completes once this write (and every write
    /// dispatched before it) has been attempted, or `None` when there is no
    /// active board or the intent changed nothing. Must run inside a tokio
    /// runtime.
    pub fn dispatch(&self, intent: Intent) -> Option<JoinHandle<()>> {
        let next = self.store.apply(|board| self.reducer.apply(board, &intent))?;
        let narrow = self.narrow_patch(&intent, &next);
        let name = intent.name();

        log::debug!("Applied {} to board {}", name, next.id);

        let (done, finished) = oneshot::channel();
        let Board { id, columns, .. } = next;
        let write = PendingWrite {
            board_id: id,
            columns,
            narrow,
            intent: name,
            done,
        };
        if let Err(mpsc::error::SendError(write)) = self.writer().send(write) {
            log::warn!("Board writer stopped, dropped save of board {}", write.board_id);
        }

        Some(tokio::spawn(async move {
            let _ = finished.await;
        }))
    }

    fn writer(&self) -> &mpsc::UnboundedSender<PendingWrite> {
        self.writer.get_or_init(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            tokio::spawn(run_writer(self.repo.clone(), rx));
            tx
        })
    }

    fn narrow_patch(&self, intent: &Intent, next: &Board) -> Option<(ColumnId, TaskId, bool)> {
        if self.toggle_persistence != TogglePersistence::NarrowThenFull {
            return None;
        }
        let Intent::ToggleTask { column_id, task_id } = intent else {
            return None;
        };
        let task = next.column(column_id)?.tasks.iter().find(|t| &t.id == task_id)?;
        Some((column_id.clone(), task_id.clone(), task.completed))
    }

    /// Write the active board's columns and wait for the result
    pub async fn flush(&self) -> GatewayResult<()> {
        let board = self.store.active_board().ok_or(GatewayError::NoActiveBoard)?;
        self.repo.set_columns(board.id, &board.columns).await?;
        Ok(())
    }

    pub async fn select_board(&self, id: BoardId) -> GatewayResult<Option<Board>> {
        self.load(Some(id)).await
    }

    /// Create a board and make it active
    pub async fn create_board(&self, name: Option<&str>) -> GatewayResult<BoardId> {
        let id = self.repo.create_board(name).await?;
        self.load(Some(id)).await?;
        Ok(id)
    }

    /// Rename a board; blank names are rejected before reaching the store
    pub async fn rename_board(&self, id: BoardId, name: &str) -> GatewayResult<()> {
        let name = normalize_name(name)
            .ok_or_else(|| GatewayError::Validation("Board name cannot be empty".to_string()))?;
        self.repo.rename_board(id, &name).await?;
        self.store.rename_board(id, &name);
        Ok(())
    }

    /// Delete a board and load the board the store hands back
    pub async fn delete_board(&self, id: BoardId) -> GatewayResult<BoardId> {
        let next = self.repo.delete_board(id).await?;
        self.load(Some(next)).await?;
        Ok(next)
    }
}
