//! Board Repository - In-Memory
//!
//! Same contract as the SQLite store, kept in process memory.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    default_columns, empty_columns, normalize_name, Board, BoardId, BoardSummary, Column,
    ColumnId, DomainError, DomainResult, TaskId, DEFAULT_BOARD_NAME, UNTITLED_BOARD_NAME,
};
use super::traits::{patch_completed, BoardRepository};

#[derive(Default)]
struct MemoryState {
    last_id: u32,
    boards: Vec<Board>,
}

impl MemoryState {
    fn insert(&mut self, name: &str, columns: Vec<Column>) -> BoardId {
        self.last_id += 1;
        let id = BoardId(self.last_id);
        self.boards.push(Board::new(id, name).with_columns(columns));
        id
    }

    fn find_mut(&mut self, id: BoardId) -> DomainResult<&mut Board> {
        self.boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Board {} not found", id)))
    }
}

/// In-memory board document store
#[derive(Default)]
pub struct MemoryBoardRepository {
    state: Mutex<MemoryState>,
}

impl MemoryBoardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing boards; ids keep counting after the highest one
    pub fn with_boards(boards: Vec<Board>) -> Self {
        let last_id = boards.iter().map(|b| b.id.0).max().unwrap_or(0);
        let mut boards = boards;
        boards.sort_by_key(|b| b.id);
        Self {
            state: Mutex::new(MemoryState { last_id, boards }),
        }
    }
}

#[async_trait]
impl BoardRepository for MemoryBoardRepository {
    async fn list_boards(&self) -> DomainResult<Vec<BoardSummary>> {
        let state = self.state.lock().await;
        Ok(state.boards.iter().map(Board::summary).collect())
    }

    async fn get_board(&self, id: Option<BoardId>) -> DomainResult<Option<Board>> {
        let state = self.state.lock().await;
        let found = id
            .and_then(|id| state.boards.iter().find(|b| b.id == id))
            .or_else(|| state.boards.first());
        Ok(found.cloned().map(Board::normalized))
    }

    async fn ensure_default_board(&self) -> DomainResult<BoardId> {
        let mut state = self.state.lock().await;
        if let Some(first) = state.boards.first() {
            return Ok(first.id);
        }
        let id = state.insert(DEFAULT_BOARD_NAME, default_columns());
        log::info!("Seeded default board {}", id);
        Ok(id)
    }

    async fn create_board(&self, name: Option<&str>) -> DomainResult<BoardId> {
        let name = name
            .and_then(normalize_name)
            .unwrap_or_else(|| UNTITLED_BOARD_NAME.to_string());
        let mut state = self.state.lock().await;
        Ok(state.insert(&name, empty_columns()))
    }

    async fn rename_board(&self, id: BoardId, name: &str) -> DomainResult<()> {
        let name = normalize_name(name)
            .ok_or_else(|| DomainError::InvalidInput("Board name cannot be empty".into()))?;
        let mut state = self.state.lock().await;
        state.find_mut(id)?.name = name;
        Ok(())
    }

    async fn delete_board(&self, id: BoardId) -> DomainResult<BoardId> {
        let mut state = self.state.lock().await;
        let before = state.boards.len();
        state.boards.retain(|b| b.id != id);
        if state.boards.len() == before {
            return Err(DomainError::NotFound(format!("Board {} not found", id)));
        }

        match state.boards.first() {
            Some(next) => Ok(next.id),
            None => {
                let seeded = state.insert(DEFAULT_BOARD_NAME, default_columns());
                log::info!("Deleted last board {}, re-seeded {}", id, seeded);
                Ok(seeded)
            }
        }
    }

    async fn set_columns(&self, id: BoardId, columns: &[Column]) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.find_mut(id)?.columns = columns.to_vec();
        Ok(())
    }

    async fn toggle_task_completed(
        &self,
        id: BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
        completed: bool,
    ) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        let board = state.find_mut(id)?;
        patch_completed(&mut board.columns, column_id, task_id, completed);
        Ok(())
    }
}
