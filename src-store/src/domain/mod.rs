//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no storage dependencies (serde only, for the document format).

mod entity;
mod board;
mod column;
mod seed;

pub use entity::{find_by_id, position_by_id, DomainError, DomainResult, Entity};
pub use board::{Board, BoardId, BoardSummary};
pub use column::{Column, ColumnId, Task, TaskId};
pub use seed::{
    default_columns, empty_columns, normalize_name, DEFAULT_BOARD_NAME, UNTITLED_BOARD_NAME,
};
