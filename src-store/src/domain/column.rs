//! Column and Task Entities
//!
//! A column is an ordered bucket of tasks. Order inside `tasks` is the only
//! ranking signal; there is no numeric position field.

use serde::{Deserialize, Serialize};
use std::fmt;
use super::entity::{position_by_id, Entity};

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh random identity
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(ColumnId);
string_id!(TaskId);

/// A unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Older documents carry no completion flag
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Named, ordered bucket of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn task_index(&self, task_id: &TaskId) -> Option<usize> {
        position_by_id(&self.tasks, task_id)
    }

    /// Number of tasks before the completed partition starts
    pub fn incomplete_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Stable re-partition: incomplete tasks first, completed tasks last,
    /// relative order kept inside each partition.
    pub fn partition(&mut self) {
        if self.is_partitioned() {
            return;
        }
        let (mut open, done): (Vec<Task>, Vec<Task>) =
            self.tasks.drain(..).partition(|t| !t.completed);
        open.extend(done);
        self.tasks = open;
    }

    pub fn is_partitioned(&self) -> bool {
        let boundary = self.incomplete_count();
        self.tasks[..boundary].iter().all(|t| !t.completed)
    }
}

impl Entity for Column {
    type Id = ColumnId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(tasks: &[(&str, bool)]) -> Column {
        Column::new("c1", "Column").with_tasks(
            tasks
                .iter()
                .map(|(id, done)| Task::new(*id, *id).completed(*done))
                .collect(),
        )
    }

    fn ids(column: &Column) -> Vec<&str> {
        column.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_partition_is_stable() {
        let mut c = column(&[("a", true), ("b", false), ("c", true), ("d", false)]);
        assert!(!c.is_partitioned());
        c.partition();
        assert_eq!(ids(&c), vec!["b", "d", "a", "c"]);
        assert!(c.is_partitioned());
    }

    #[test]
    fn test_empty_column_is_partitioned() {
        let c = column(&[]);
        assert!(c.is_partitioned());
        assert_eq!(c.incomplete_count(), 0);
    }

    #[test]
    fn test_missing_completed_defaults_to_false() {
        let task: Task = serde_json::from_str(r#"{"id":"t1","text":"Write docs"}"#).unwrap();
        assert!(!task.completed);
        assert_eq!(task.id(), &TaskId::from("t1"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ColumnId::generate(), ColumnId::generate());
        assert_ne!(TaskId::generate(), TaskId::generate());
    }
}
