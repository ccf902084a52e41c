//! Board Repository - SQLite
//!
//! Each board is one row; its column list is stored as a JSON document
//! and always written whole.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{
    default_columns, empty_columns, normalize_name, Board, BoardId, BoardSummary, Column,
    ColumnId, DomainError, DomainResult, TaskId, DEFAULT_BOARD_NAME, UNTITLED_BOARD_NAME,
};
use super::traits::{patch_completed, BoardRepository};

/// SQLite implementation of the board document store
pub struct SqliteBoardRepository {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteBoardRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn insert_board(conn: &Connection, name: &str, columns: &[Column]) -> DomainResult<BoardId> {
    let now = now_millis();
    conn.execute(
        "INSERT INTO boards (name, columns, created_at, updated_at) VALUES (?, ?, ?, ?)",
        params![name, serde_json::to_string(columns)?, now, now],
    )?;
    let id = u32::try_from(conn.last_insert_rowid())
        .map_err(|e| DomainError::Internal(format!("Board id out of range: {}", e)))?;
    Ok(BoardId(id))
}

fn first_board_id(conn: &Connection) -> DomainResult<Option<BoardId>> {
    let id = conn
        .query_row("SELECT id FROM boards ORDER BY id LIMIT 1", [], |row| row.get::<_, u32>(0))
        .optional()?;
    Ok(id.map(BoardId))
}

fn read_board(conn: &Connection, id: Option<BoardId>) -> DomainResult<Option<Board>> {
    let row = match id {
        Some(id) => conn
            .query_row(
                "SELECT id, name, columns FROM boards WHERE id = ?",
                params![id.0],
                row_to_parts,
            )
            .optional()?,
        None => None,
    };

    let row = match row {
        Some(row) => Some(row),
        None => conn
            .query_row(
                "SELECT id, name, columns FROM boards ORDER BY id LIMIT 1",
                [],
                row_to_parts,
            )
            .optional()?,
    };

    row.map(|(id, name, columns)| {
        let columns: Vec<Column> = serde_json::from_str(&columns)?;
        Ok(Board::new(BoardId(id), name).with_columns(columns).normalized())
    })
    .transpose()
}

fn row_to_parts(row: &rusqlite::Row<'_>) -> rusqlite::Result<(u32, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

#[async_trait]
impl BoardRepository for SqliteBoardRepository {
    async fn list_boards(&self) -> DomainResult<Vec<BoardSummary>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT id, name FROM boards ORDER BY id")?;
        let mut rows = stmt.query([])?;

        let mut boards = Vec::new();
        while let Some(row) = rows.next()? {
            boards.push(BoardSummary {
                id: BoardId(row.get(0)?),
                name: row.get(1)?,
            });
        }
        Ok(boards)
    }

    async fn get_board(&self, id: Option<BoardId>) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        read_board(conn, id)
    }

    async fn ensure_default_board(&self) -> DomainResult<BoardId> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        if let Some(id) = first_board_id(&tx)? {
            return Ok(id);
        }
        let id = insert_board(&tx, DEFAULT_BOARD_NAME, &default_columns())?;
        tx.commit()?;

        log::info!("Seeded default board {}", id);
        Ok(id)
    }

    async fn create_board(&self, name: Option<&str>) -> DomainResult<BoardId> {
        let name = name
            .and_then(normalize_name)
            .unwrap_or_else(|| UNTITLED_BOARD_NAME.to_string());

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        insert_board(conn, &name, &empty_columns())
    }

    async fn rename_board(&self, id: BoardId, name: &str) -> DomainResult<()> {
        let name = normalize_name(name)
            .ok_or_else(|| DomainError::InvalidInput("Board name cannot be empty".into()))?;

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE boards SET name = ?, updated_at = ? WHERE id = ?",
            params![name, now_millis(), id.0],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Board {} not found", id)));
        }
        Ok(())
    }

    async fn delete_board(&self, id: BoardId) -> DomainResult<BoardId> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM boards WHERE id = ?", params![id.0])?;
        if removed == 0 {
            return Err(DomainError::NotFound(format!("Board {} not found", id)));
        }

        // A board collection is never empty
        let next = match first_board_id(&tx)? {
            Some(next) => next,
            None => {
                let seeded = insert_board(&tx, DEFAULT_BOARD_NAME, &default_columns())?;
                log::info!("Deleted last board {}, re-seeded {}", id, seeded);
                seeded
            }
        };
        tx.commit()?;
        Ok(next)
    }

    async fn set_columns(&self, id: BoardId, columns: &[Column]) -> DomainResult<()> {
        let json = serde_json::to_string(columns)?;

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE boards SET columns = ?, updated_at = ? WHERE id = ?",
            params![json, now_millis(), id.0],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Board {} not found", id)));
        }
        Ok(())
    }

    async fn toggle_task_completed(
        &self,
        id: BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
        completed: bool,
    ) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let stored: Option<String> = tx
            .query_row("SELECT columns FROM boards WHERE id = ?", params![id.0], |row| row.get(0))
            .optional()?;
        let stored =
            stored.ok_or_else(|| DomainError::NotFound(format!("Board {} not found", id)))?;

        let mut columns: Vec<Column> = serde_json::from_str(&stored)?;
        if patch_completed(&mut columns, column_id, task_id, completed) {
            tx.execute(
                "UPDATE boards SET columns = ?, updated_at = ? WHERE id = ?",
                params![serde_json::to_string(&columns)?, now_millis(), id.0],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
