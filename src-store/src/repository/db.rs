//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: Arc<Mutex<Option<Connection>>>,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared connection handle for repositories
    pub fn connection(&self) -> Arc<Mutex<Option<Connection>>> {
        self.conn.clone()
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; repositories report "not initialized" afterwards
    pub async fn close(&self) {
        self.conn.lock().await.take();
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize database with path (`":memory:"` for a throwaway database)
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::Internal(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        Connection::open(db_path)?
    };

    run_migrations(&conn)?;
    log::info!("Board database ready at {}", db_path.display());

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS boards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            columns TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    // Added after the first release; older files lack it
    if !column_exists(conn, "boards", "updated_at")? {
        conn.execute(
            "ALTER TABLE boards ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0",
            (),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_in_memory() {
        let state = init_db(Path::new(":memory:")).await.expect("init");
        assert!(state.is_initialized().await);
        state.close().await;
        assert!(!state.is_initialized().await);
    }

    #[tokio::test]
    async fn test_migration_adds_updated_at() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE boards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                columns TEXT NOT NULL DEFAULT '[]',
                created_at INTEGER NOT NULL DEFAULT 0
            )",
            (),
        )
        .unwrap();
        assert!(!column_exists(&conn, "boards", "updated_at").unwrap());

        run_migrations(&conn).unwrap();
        assert!(column_exists(&conn, "boards", "updated_at").unwrap());

        // Second run is a no-op
        run_migrations(&conn).unwrap();
    }

    #[tokio::test]
    async fn test_init_file_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("boards.db");
        init_db(&path).await.expect("init");
        assert!(path.exists());
    }
}
