//! Board Reducer
//!
//! Pure transformation `(Board, Intent) -> Board`. The input board is never
//! mutated; an intent that cannot apply (blank text, unknown id) returns an
//! equal board. Every column an intent touches comes out partitioned:
//! incomplete tasks first, completed tasks last.

use serde::{Deserialize, Serialize};

use crate::intent::{Intent, Placement, TaskTarget};
use crate::models::{normalize_name, Board, Column, ColumnId, Task, TaskId};

/// What happens when `RemoveTask` empties a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyColumnPolicy {
    #[default]
    LeaveEmpty,
    /// Re-insert a placeholder task so the column never ends up empty
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerSettings {
    pub empty_column: EmptyColumnPolicy,
    pub default_column_title: String,
    pub placeholder_text: String,
}

impl Default for ReducerSettings {
    fn default() -> Self {
        Self {
            empty_column: EmptyColumnPolicy::LeaveEmpty,
            default_column_title: "New Column".to_string(),
            placeholder_text: "New task".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reducer {
    settings: ReducerSettings,
}

/// Apply with default settings
pub fn apply(state: &Board, intent: &Intent) -> Board {
    Reducer::default().apply(state, intent)
}

impl Reducer {
    pub fn new(settings: ReducerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReducerSettings {
        &self.settings
    }

    pub fn apply(&self, state: &Board, intent: &Intent) -> Board {
        let mut next = state.clone();
        match intent {
            Intent::RenameColumn { column_id, title } => {
                if let (Some(title), Some(column)) =
                    (normalize_name(title), column_mut(&mut next, column_id))
                {
                    column.title = title;
                }
            }
            Intent::InsertColumn { index, column_id, title } => {
                self.insert_column(&mut next, *index, column_id, title.as_deref());
            }
            Intent::RemoveColumn { column_id } => {
                next.columns.retain(|c| &c.id != column_id);
            }
            Intent::InsertTask { column_id, index, task_id, text } => {
                insert_task(&mut next, column_id, *index, task_id, text);
            }
            Intent::RenameTask { task_id, text } => {
                if let (Some(text), Some((ci, ti))) =
                    (normalize_name(text), next.locate_task(task_id))
                {
                    next.columns[ci].tasks[ti].text = text;
                }
            }
            Intent::RemoveTask { column_id, task_id, placeholder_id } => {
                self.remove_task(&mut next, column_id, task_id, placeholder_id);
            }
            Intent::ToggleTask { column_id, task_id } => {
                if let Some(column) = column_mut(&mut next, column_id) {
                    if let Some(task) = column.tasks.iter_mut().find(|t| &t.id == task_id) {
                        task.completed = !task.completed;
                        column.partition();
                    }
                }
            }
            Intent::MoveColumn { from, to } => move_column(&mut next, from, to),
            Intent::MoveTask { task_id, target } => move_task(&mut next, task_id, target),
            Intent::ResetCompleted { column_id } => {
                for column in next.columns.iter_mut() {
                    if column_id.as_ref().map_or(true, |id| &column.id == id) {
                        column.tasks.iter_mut().for_each(|t| t.completed = false);
                    }
                }
            }
        }
        next
    }

    fn insert_column(
        &self,
        board: &mut Board,
        index: usize,
        column_id: &ColumnId,
        title: Option<&str>,
    ) {
        let title = match title {
            None => self.settings.default_column_title.clone(),
            Some(title) => match normalize_name(title) {
                Some(title) => title,
                None => return,
            },
        };
        if board.column_index(column_id).is_some() {
            return;
        }
        let index = index.min(board.columns.len());
        board.columns.insert(index, Column::new(column_id.clone(), title));
    }

    fn remove_task(
        &self,
        board: &mut Board,
        column_id: &ColumnId,
        task_id: &TaskId,
        placeholder_id: &TaskId,
    ) {
        let placeholder_free = board.locate_task(placeholder_id).is_none();
        let Some(column) = column_mut(board, column_id) else {
            return;
        };
        let Some(index) = column.task_index(task_id) else {
            return;
        };
        column.tasks.remove(index);

        if column.tasks.is_empty()
            && self.settings.empty_column == EmptyColumnPolicy::Placeholder
            && placeholder_free
        {
            column
                .tasks
                .push(Task::new(placeholder_id.clone(), self.settings.placeholder_text.clone()));
        }
    }
}

fn column_mut<'a>(board: &'a mut Board, id: &ColumnId) -> Option<&'a mut Column> {
    board.columns.iter_mut().find(|c| &c.id == id)
}

fn insert_task(
    board: &mut Board,
    column_id: &ColumnId,
    index: usize,
    task_id: &TaskId,
    text: &str,
) {
    let Some(text) = normalize_name(text) else {
        return;
    };
    if board.locate_task(task_id).is_some() {
        return;
    }
    if let Some(column) = column_mut(board, column_id) {
        let index = index.min(column.tasks.len());
        column.tasks.insert(index, Task::new(task_id.clone(), text));
        column.partition();
    }
}

fn move_column(board: &mut Board, from: &ColumnId, to: &ColumnId) {
    if from == to {
        return;
    }
    let (Some(from_index), Some(to_index)) = (board.column_index(from), board.column_index(to))
    else {
        return;
    };
    let column = board.columns.remove(from_index);
    board.columns.insert(to_index, column);
}

fn move_task(board: &mut Board, task_id: &TaskId, target: &TaskTarget) {
    let Some((source_col, source_index)) = board.locate_task(task_id) else {
        return;
    };

    // Resolve the destination column before touching anything
    let dest_col = match target {
        TaskTarget::Task { task_id: target_id, .. } => {
            if target_id == task_id {
                return;
            }
            match board.locate_task(target_id) {
                Some((ci, _)) => ci,
                None => return,
            }
        }
        TaskTarget::Column { column_id } => match board.column_index(column_id) {
            Some(ci) => ci,
            None => return,
        },
    };

    let task = board.columns[source_col].tasks.remove(source_index);
    let dest = &mut board.columns[dest_col];
    let index = match target {
        TaskTarget::Task { task_id: target_id, placement } => {
            // Target is still present: only the source was removed
            let at = dest.task_index(target_id).unwrap_or(dest.tasks.len());
            match placement {
                Placement::Before => at,
                Placement::After => at + 1,
            }
        }
        // Partition boundary: after the active tasks, before the completed ones
        TaskTarget::Column { .. } => dest.incomplete_count(),
    };
    dest.tasks.insert(index.min(dest.tasks.len()), task);
    dest.partition();
}
