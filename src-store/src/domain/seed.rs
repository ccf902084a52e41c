//! Board seeding and naming rules

use super::column::{Column, ColumnId, Task, TaskId};

/// Name of the board created when the collection is empty
pub const DEFAULT_BOARD_NAME: &str = "My Board";

/// Name used by `create_board` when no usable name is given
pub const UNTITLED_BOARD_NAME: &str = "Untitled Board";

const COLUMN_TITLES: [&str; 3] = ["Backlog", "In Progress", "Done"];

/// Trim a user-supplied name; empty results are rejected
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The three standard columns without tasks
pub fn empty_columns() -> Vec<Column> {
    COLUMN_TITLES
        .iter()
        .map(|title| Column::new(ColumnId::generate(), *title))
        .collect()
}

/// Standard columns with sample tasks, used for the default board
pub fn default_columns() -> Vec<Column> {
    let samples: [&[(&str, bool)]; 3] = [
        &[("Plan the week", false), ("Collect ideas", false)],
        &[("Draft the first version", false)],
        &[("Set up the board", true)],
    ];
    empty_columns()
        .into_iter()
        .zip(samples)
        .map(|(column, tasks)| {
            column.with_tasks(
                tasks
                    .iter()
                    .map(|(text, done)| Task::new(TaskId::generate(), *text).completed(*done))
                    .collect(),
            )
        })
        .collect()
}
