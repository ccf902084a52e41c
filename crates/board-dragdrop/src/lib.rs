//! Board DragDrop Utilities
//!
//! Framework-free drag-and-drop state for sortable containers.
//! Uses a movement threshold to distinguish click from drag; the
//! finished gesture is handed out as a (dragged item, drop) pair.

use serde::{Deserialize, Serialize};

/// Where a draggable item lives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container<Id> {
    /// Top-level list (e.g. the columns of a board)
    Root,
    /// Nested list owned by the item with this id
    Group(Id),
}

/// A draggable item and its current slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem<Id> {
    pub id: Id,
    pub container: Container<Id>,
    pub index: usize,
}

impl<Id> DragItem<Id> {
    pub fn root(id: Id, index: usize) -> Self {
        Self { id, container: Container::Root, index }
    }

    pub fn in_group(id: Id, group: Id, index: usize) -> Self {
        Self { id, container: Container::Group(group), index }
    }
}

/// Drop target types
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget<Id> {
    /// Drop on another item
    Item(DragItem<Id>),
    /// Drop on the empty area of a container
    Zone(Container<Id>),
}

/// Outcome of a released drag; `over` is `None` when the gesture was cancelled
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd<Id> {
    pub over: Option<DropTarget<Id>>,
}

impl<Id> DragEnd<Id> {
    pub fn cancelled() -> Self {
        Self { over: None }
    }

    pub fn over(target: DropTarget<Id>) -> Self {
        Self { over: Some(target) }
    }
}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

#[derive(Clone, Debug, PartialEq)]
enum Phase<Id> {
    Idle,
    /// Pressed but not yet moved far enough
    Pending { item: DragItem<Id>, start_x: i32, start_y: i32 },
    Dragging { item: DragItem<Id>, over: Option<DropTarget<Id>> },
}

/// Pointer gesture tracker
///
/// `press` -> `pointer_move` (past the threshold) -> `hover`/`leave` -> `release`.
#[derive(Clone, Debug)]
pub struct DragSession<Id> {
    threshold_px: i32,
    phase: Phase<Id>,
}

impl<Id: Clone + PartialEq> Default for DragSession<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + PartialEq> DragSession<Id> {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold_px: i32) -> Self {
        Self {
            threshold_px: threshold_px.max(0),
            phase: Phase::Idle,
        }
    }

    /// Record pending drag with start position
    pub fn press(&mut self, item: DragItem<Id>, x: i32, y: i32) {
        self.phase = Phase::Pending { item, start_x: x, start_y: y };
    }

    /// Starts dragging once moved beyond the threshold. Returns true on the
    /// move that started the drag.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        let started = match &self.phase {
            Phase::Pending { item, start_x, start_y } => {
                let dx = (x - start_x).abs();
                let dy = (y - start_y).abs();
                (dx > self.threshold_px || dy > self.threshold_px).then(|| item.clone())
            }
            _ => None,
        };
        match started {
            Some(item) => {
                self.phase = Phase::Dragging { item, over: None };
                true
            }
            None => false,
        }
    }

    /// Pointer entered a target. Hovering the dragged item itself is ignored.
    pub fn hover(&mut self, target: DropTarget<Id>) {
        if let Phase::Dragging { item, over } = &mut self.phase {
            if matches!(&target, DropTarget::Item(t) if t.id == item.id) {
                return;
            }
            *over = Some(target);
        }
    }

    pub fn leave(&mut self) {
        if let Phase::Dragging { over, .. } = &mut self.phase {
            *over = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn dragging(&self) -> Option<&DragItem<Id>> {
        match &self.phase {
            Phase::Dragging { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn current_target(&self) -> Option<&DropTarget<Id>> {
        match &self.phase {
            Phase::Dragging { over, .. } => over.as_ref(),
            _ => None,
        }
    }

    /// End the gesture. `None` when it never became a drag (a click).
    pub fn release(&mut self) -> Option<(DragItem<Id>, DragEnd<Id>)> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging { item, over } => Some((item, DragEnd { over })),
            _ => None,
        }
    }

    /// Abort without producing a drop
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}
