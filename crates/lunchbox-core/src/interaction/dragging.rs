//! Ephemeral state of an in-progress drag.

use kurbo::{Point, Rect, Vec2};

use crate::model::{AppState, BlockItem, BlockPosition, Group};

use super::state::CanvasState;

/// Where a dragged block or group would land: next to `item`.
#[derive(Debug, Clone)]
pub struct TargetBlockPlacement {
    pub item: BlockItem,
    pub after: bool,
}

impl PartialEq for TargetBlockPlacement {
    fn eq(&self, other: &Self) -> bool {
        self.item.is_same_item(&other.item) && self.after == other.after
    }
}

impl TargetBlockPlacement {
    /// Decide before or after `item` from where `point` sits on the block.
    ///
    /// The block's middle line splits it whichever way the pointer travels:
    /// from the middle line down the drop goes after the block, above it the
    /// drop goes before.
    pub fn resolve(item: BlockItem, frame: Rect, point: Point) -> Self {
        let after = point.y >= frame.center().y;
        Self { item, after }
    }
}

/// Everything remembered between pan events of one drag.
///
/// Frames and points are in document coordinates.
#[derive(Debug, Clone)]
pub struct DraggingState {
    /// Document as it was when the gesture began, for the undo entry.
    pub original_state: AppState,
    pub previous_canvas_state: CanvasState,
    pub initial_point: Point,
    /// Frame of the dragged item when it was picked up.
    pub initial_frame: Rect,
    /// Offset from the pointer to the dragged frame's origin.
    pub frame_offset: Vec2,
    /// Where the dragged item is drawn now. `None` until picked up.
    pub dragged_frame: Option<Rect>,
    pub original_position: Option<BlockPosition>,
    pub target_position: Option<BlockPosition>,
    pub last_target_placement: Option<TargetBlockPlacement>,
    /// The dragged group as it was when picked up. It leaves the page while
    /// merged into another group.
    pub group: Option<Group>,
    pub did_change_frame: bool,
}

impl DraggingState {
    pub fn new(original_state: AppState, previous_canvas_state: CanvasState, initial_point: Point) -> Self {
        Self {
            original_state,
            previous_canvas_state,
            initial_point,
            initial_frame: Rect::ZERO,
            frame_offset: Vec2::ZERO,
            dragged_frame: None,
            original_position: None,
            target_position: None,
            last_target_placement: None,
            group: None,
            did_change_frame: false,
        }
    }

    /// Pick up an item drawn at `frame` with the pointer at `point`.
    pub fn capture(&mut self, frame: Rect, point: Point) {
        self.initial_frame = frame;
        self.frame_offset = frame.origin() - point;
        self.dragged_frame = Some(frame);
    }

    /// Move the dragged frame with the pointer.
    pub fn update_dragged_frame(&mut self, point: Point) -> Option<Rect> {
        let frame = self.dragged_frame.as_mut()?;
        *frame = self.initial_frame.with_origin(point + self.frame_offset);
        Some(*frame)
    }

    /// Whether the gesture changed the document.
    pub fn did_change_position(&self) -> bool {
        self.target_position != self.original_position || self.did_change_frame
    }
}
