//! Repository Layer - Core Traits
//!
//! Defines the document store contract the board client talks to.
//! Implementations can use SQLite, in-memory, a remote service, etc.

use async_trait::async_trait;
use crate::domain::{Board, BoardId, BoardSummary, Column, ColumnId, DomainResult, TaskId};

/// Key-value document service holding boards
///
/// Every write is a full-state overwrite of the fields it names, so
/// writes reordered by the transport converge on the last one applied.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// All boards in creation order
    async fn list_boards(&self) -> DomainResult<Vec<BoardSummary>>;

    /// Board by id; falls back to the first board when `id` is `None` or
    /// unknown. `None` only when no boards exist. Columns come back in
    /// canonical order (incomplete tasks before completed ones).
    async fn get_board(&self, id: Option<BoardId>) -> DomainResult<Option<Board>>;

    /// Create the seeded default board unless one exists; returns the first board id
    async fn ensure_default_board(&self) -> DomainResult<BoardId>;

    async fn create_board(&self, name: Option<&str>) -> DomainResult<BoardId>;

    /// Fails on an empty (trimmed) name or a missing board
    async fn rename_board(&self, id: BoardId, name: &str) -> DomainResult<()>;

    /// Returns a remaining board, re-seeding when the last one was removed
    async fn delete_board(&self, id: BoardId) -> DomainResult<BoardId>;

    /// Full replace of the column list
    async fn set_columns(&self, id: BoardId, columns: &[Column]) -> DomainResult<()>;

    /// Narrow patch of one completion flag; unknown column/task is a no-op
    async fn toggle_task_completed(
        &self,
        id: BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
        completed: bool,
    ) -> DomainResult<()>;
}

/// Set a completion flag inside a column list. Returns whether anything changed.
pub(crate) fn patch_completed(
    columns: &mut [Column],
    column_id: &ColumnId,
    task_id: &TaskId,
    completed: bool,
) -> bool {
    columns
        .iter_mut()
        .find(|c| &c.id == column_id)
        .and_then(|c| c.tasks.iter_mut().find(|t| &t.id == task_id))
        .map(|task| {
            let changed = task.completed != completed;
            task.completed = completed;
            changed
        })
        .unwrap_or(false)
}
