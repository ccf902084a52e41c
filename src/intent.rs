//! Editing Intents
//!
//! One intent describes one requested edit. Identities for new columns and
//! tasks are generated when the intent is built, so applying it is deterministic.

use serde::{Deserialize, Serialize};

use crate::models::{ColumnId, TaskId};

/// Which side of the hovered task a moved task lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
}

/// Destination of a task move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskTarget {
    /// Next to another task
    Task { task_id: TaskId, placement: Placement },
    /// Into a column, landing as the last active task
    Column { column_id: ColumnId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    RenameColumn {
        column_id: ColumnId,
        title: String,
    },
    InsertColumn {
        index: usize,
        column_id: ColumnId,
        /// `None` uses the reducer's default title
        title: Option<String>,
    },
    RemoveColumn {
        column_id: ColumnId,
    },
    InsertTask {
        column_id: ColumnId,
        index: usize,
        task_id: TaskId,
        text: String,
    },
    RenameTask {
        task_id: TaskId,
        text: String,
    },
    RemoveTask {
        column_id: ColumnId,
        task_id: TaskId,
        /// Identity for the placeholder, used only under `EmptyColumnPolicy::Placeholder`
        placeholder_id: TaskId,
    },
    ToggleTask {
        column_id: ColumnId,
        task_id: TaskId,
    },
    MoveColumn {
        from: ColumnId,
        to: ColumnId,
    },
    MoveTask {
        task_id: TaskId,
        target: TaskTarget,
    },
    /// Reopen completed tasks in one column, or on the whole board
    ResetCompleted {
        column_id: Option<ColumnId>,
    },
}

impl Intent {
    pub fn rename_column(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Intent::RenameColumn {
            column_id: column_id.into(),
            title: title.into(),
        }
    }

    pub fn insert_column(index: usize, title: Option<&str>) -> Self {
        Intent::InsertColumn {
            index,
            column_id: ColumnId::generate(),
            title: title.map(str::to_string),
        }
    }

    pub fn remove_column(column_id: impl Into<ColumnId>) -> Self {
        Intent::RemoveColumn {
            column_id: column_id.into(),
        }
    }

    pub fn insert_task(
        column_id: impl Into<ColumnId>,
        index: usize,
        text: impl Into<String>,
    ) -> Self {
        Intent::InsertTask {
            column_id: column_id.into(),
            index,
            task_id: TaskId::generate(),
            text: text.into(),
        }
    }

    pub fn rename_task(task_id: impl Into<TaskId>, text: impl Into<String>) -> Self {
        Intent::RenameTask {
            task_id: task_id.into(),
            text: text.into(),
        }
    }

    pub fn remove_task(column_id: impl Into<ColumnId>, task_id: impl Into<TaskId>) -> Self {
        Intent::RemoveTask {
            column_id: column_id.into(),
            task_id: task_id.into(),
            placeholder_id: TaskId::generate(),
        }
    }

    pub fn toggle_task(column_id: impl Into<ColumnId>, task_id: impl Into<TaskId>) -> Self {
        Intent::ToggleTask {
            column_id: column_id.into(),
            task_id: task_id.into(),
        }
    }

    pub fn move_column(from: impl Into<ColumnId>, to: impl Into<ColumnId>) -> Self {
        Intent::MoveColumn {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn move_task_next_to(
        task_id: impl Into<TaskId>,
        target: impl Into<TaskId>,
        placement: Placement,
    ) -> Self {
        Intent::MoveTask {
            task_id: task_id.into(),
            target: TaskTarget::Task {
                task_id: target.into(),
                placement,
            },
        }
    }

    pub fn move_task_to_column(task_id: impl Into<TaskId>, column_id: impl Into<ColumnId>) -> Self {
        Intent::MoveTask {
            task_id: task_id.into(),
            target: TaskTarget::Column {
                column_id: column_id.into(),
            },
        }
    }

    pub fn reset_completed(column_id: Option<ColumnId>) -> Self {
        Intent::ResetCompleted { column_id }
    }

    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::RenameColumn { .. } => "rename_column",
            Intent::InsertColumn { .. } => "insert_column",
            Intent::RemoveColumn { .. } => "remove_column",
            Intent::InsertTask { .. } => "insert_task",
            Intent::RenameTask { .. } => "rename_task",
            Intent::RemoveTask { .. } => "remove_task",
            Intent::ToggleTask { .. } => "toggle_task",
            Intent::MoveColumn { .. } => "move_column",
            Intent::MoveTask { .. } => "move_task",
            Intent::ResetCompleted { .. } => "reset_completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_generate_fresh_ids() {
        let a = Intent::insert_task("c1", 0, "x");
        let b = Intent::insert_task("c1", 0, "x");
        assert_ne!(a, b);

        match Intent::insert_column(2, None) {
            Intent::InsertColumn { index, title, .. } => {
                assert_eq!(index, 2);
                assert_eq!(title, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_intent_json_shape() {
        let intent = Intent::move_task_to_column("t1", "done");
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "move_task");
        assert_eq!(json["payload"]["target"]["kind"], "column");
        assert_eq!(json["payload"]["target"]["column_id"], "done");

        let back: Intent = serde_json::from_value(json).unwrap();
        assert_eq!(back, intent);
    }
}
