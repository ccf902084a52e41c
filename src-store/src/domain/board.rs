//! Board Entity
//!
//! Top-level container of columns; one selectable unit of work.

use serde::{Deserialize, Serialize};
use std::fmt;
use super::column::{Column, ColumnId, Task, TaskId};
use super::entity::{find_by_id, position_by_id, Entity};

/// Store-assigned board identity (creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u32);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub name: String,
}

/// A board and its ordered columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        find_by_id(&self.columns, id)
    }

    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        position_by_id(&self.columns, id)
    }

    /// Locate a task anywhere on the board: (column index, task index)
    pub fn locate_task(&self, task_id: &TaskId) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, c)| c.task_index(task_id).map(|ti| (ci, ti)))
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.locate_task(task_id)
            .map(|(ci, ti)| &self.columns[ci].tasks[ti])
    }

    /// Re-partition every column into canonical on-read order
    pub fn normalized(mut self) -> Self {
        for column in &mut self.columns {
            column.partition();
        }
        self
    }
}

impl Entity for Board {
    type Id = BoardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
