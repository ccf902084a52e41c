//! Kanban Store
//!
//! Layered architecture:
//! - domain: Boards, columns, tasks and seeding rules
//! - repository: Document store abstraction and its SQLite / in-memory implementations

pub mod domain;
pub mod repository;

pub use domain::{
    Board, BoardId, BoardSummary, Column, ColumnId, DomainError, DomainResult, Entity, Task, TaskId,
};
pub use repository::{
    init_db, BoardRepository, DbState, MemoryBoardRepository, SqliteBoardRepository,
};
