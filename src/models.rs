//! Client Models
//!
//! The board shapes are shared with the store crate so the client and the
//! document store agree on one schema.

pub use kanban_store::domain::{
    normalize_name, Board, BoardId, BoardSummary, Column, ColumnId, Task, TaskId,
};
