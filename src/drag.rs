//! Drag Interpreter
//!
//! Maps a finished drag gesture to one editing intent. Columns live in the
//! board's root container; tasks live in a group keyed by their column id.
//! Pixel thresholds are the gesture layer's business (`DragSession`).

use board_dragdrop::{Container, DragEnd, DragItem, DropTarget};

use crate::intent::{Intent, Placement};
use crate::models::{ColumnId, TaskId};

/// Dragged element classified by its origin container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraggedKind {
    Column,
    Task { column_id: ColumnId },
}

pub fn classify(item: &DragItem<String>) -> DraggedKind {
    match &item.container {
        Container::Root => DraggedKind::Column,
        Container::Group(column) => DraggedKind::Task {
            column_id: ColumnId::from(column.as_str()),
        },
    }
}

/// `None` when the drop was cancelled or changes nothing
pub fn interpret(start: &DragItem<String>, end: &DragEnd<String>) -> Option<Intent> {
    let over = end.over.as_ref()?;

    match classify(start) {
        DraggedKind::Column => {
            let target = match over {
                DropTarget::Item(item) => match &item.container {
                    Container::Root => item.id.as_str(),
                    // Hovering a task: use the column that holds it
                    Container::Group(column) => column.as_str(),
                },
                DropTarget::Zone(_) => return None,
            };
            if target == start.id {
                return None;
            }
            Some(Intent::move_column(start.id.as_str(), target))
        }
        DraggedKind::Task { column_id } => match over {
            DropTarget::Item(item) => match &item.container {
                Container::Root => Some(Intent::move_task_to_column(
                    start.id.as_str(),
                    item.id.as_str(),
                )),
                Container::Group(target_column) => {
                    if item.id == start.id {
                        return None;
                    }
                    let same_column = target_column.as_str() == column_id.as_str();
                    let placement = if same_column && start.index < item.index {
                        Placement::After
                    } else {
                        Placement::Before
                    };
                    Some(Intent::move_task_next_to(
                        TaskId::from(start.id.as_str()),
                        TaskId::from(item.id.as_str()),
                        placement,
                    ))
                }
            },
            DropTarget::Zone(Container::Group(target_column)) => Some(Intent::move_task_to_column(
                start.id.as_str(),
                target_column.as_str(),
            )),
            DropTarget::Zone(Container::Root) => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::TaskTarget;

    fn column(id: &str, index: usize) -> DragItem<String> {
        DragItem::root(id.to_string(), index)
    }

    fn task(id: &str, column: &str, index: usize) -> DragItem<String> {
        DragItem::in_group(id.to_string(), column.to_string(), index)
    }

    #[test]
    fn test_classify_by_container() {
        assert_eq!(classify(&column("c1", 0)), DraggedKind::Column);
        assert_eq!(
            classify(&task("t1", "c1", 0)),
            DraggedKind::Task { column_id: "c1".into() }
        );
    }

    #[test]
    fn test_cancelled_drop_is_none() {
        assert_eq!(interpret(&column("c1", 0), &DragEnd::cancelled()), None);
        assert_eq!(interpret(&task("t1", "c1", 0), &DragEnd::cancelled()), None);
    }

    #[test]
    fn test_column_over_column() {
        let end = DragEnd::over(DropTarget::Item(column("c1", 0)));
        assert_eq!(
            interpret(&column("c2", 1), &end),
            Some(Intent::move_column("c2", "c1"))
        );
        let same = DragEnd::over(DropTarget::Item(column("c2", 1)));
        assert_eq!(interpret(&column("c2", 1), &same), None);
    }

    #[test]
    fn test_column_over_task_uses_owning_column() {
        let end = DragEnd::over(DropTarget::Item(task("t9", "c3", 0)));
        assert_eq!(
            interpret(&column("c1", 0), &end),
            Some(Intent::move_column("c1", "c3"))
        );
        let own = DragEnd::over(DropTarget::Item(task("t1", "c1", 0)));
        assert_eq!(interpret(&column("c1", 0), &own), None);
        let zone = DragEnd::over(DropTarget::Zone(Container::Root));
        assert_eq!(interpret(&column("c1", 0), &zone), None);
    }

    #[test]
    fn test_task_over_task_same_column() {
        let down = DragEnd::over(DropTarget::Item(task("t3", "c1", 2)));
        assert_eq!(
            interpret(&task("t1", "c1", 0), &down),
            Some(Intent::move_task_next_to("t1", "t3", Placement::After))
        );

        let up = DragEnd::over(DropTarget::Item(task("t1", "c1", 0)));
        assert_eq!(
            interpret(&task("t3", "c1", 2), &up),
            Some(Intent::move_task_next_to("t3", "t1", Placement::Before))
        );

        // Hovering itself is no move
        let own = DragEnd::over(DropTarget::Item(task("t1", "c1", 0)));
        assert_eq!(interpret(&task("t1", "c1", 0), &own), None);
    }

    #[test]
    fn test_task_over_task_other_column() {
        let end = DragEnd::over(DropTarget::Item(task("x", "c2", 0)));
        match interpret(&task("t1", "c1", 3), &end) {
            Some(Intent::MoveTask { task_id, target }) => {
                assert_eq!(task_id, TaskId::from("t1"));
                assert_eq!(
                    target,
                    TaskTarget::Task { task_id: "x".into(), placement: Placement::Before }
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_task_over_column() {
        let end = DragEnd::over(DropTarget::Item(column("done", 2)));
        assert_eq!(
            interpret(&task("t1", "c1", 0), &end),
            Some(Intent::move_task_to_column("t1", "done"))
        );

        let zone = DragEnd::over(DropTarget::Zone(Container::Group("done".to_string())));
        assert_eq!(
            interpret(&task("t1", "c1", 0), &zone),
            Some(Intent::move_task_to_column("t1", "done"))
        );

        let root = DragEnd::over(DropTarget::Zone(Container::Root));
        assert_eq!(interpret(&task("t1", "c1", 0), &root), None);
    }

    #[test]
    fn test_adjacent_before_is_still_a_move() {
        // t2 at index 1 dropped before t1 at index 0
        let end = DragEnd::over(DropTarget::Item(task("t1", "c1", 0)));
        assert_eq!(
            interpret(&task("t2", "c1", 1), &end),
            Some(Intent::move_task_next_to("t2", "t1", Placement::Before))
        );
    }
}
