//! The canvas interaction controller.
//!
//! Turns host gestures into canvas state transitions and store dispatches.
//! The controller owns the open [`Document`]; the render layer reads the
//! document state, [`CanvasState`], highlight and dragged frame from here and
//! never mutates the document itself.

use kurbo::{Point, Rect, Vec2};

use crate::action::Action;
use crate::config::CanvasConfig;
use crate::document::Document;
use crate::model::{AppState, Block, BlockId, BlockItem, BlockType, Group, GroupId, Page};
use crate::sizing::GroupSizer;

use super::dragging::{DraggingState, TargetBlockPlacement};
use super::gesture::{GesturePhase, PanEvent, PinchEvent, PressEvent};
use super::guard::InteractionGuard;
use super::handles::{HandlePosition, handle_at};
use super::hit::{block_at, closest_block, group_at};
use super::state::CanvasState;
use super::viewport::Viewport;

/// What is drawn highlighted while a finger is down.
#[derive(Debug, Clone, PartialEq)]
pub enum Highlight {
    Group(GroupId),
    Block(BlockItem),
}

#[derive(Debug, Clone)]
struct EditingSession {
    /// The block with its live, unsaved text.
    item: BlockItem,
    unedited: Block,
    /// Document before editing started, for the undo entry.
    original_state: AppState,
}

/// Drives canvas interaction for one document.
#[derive(Debug)]
pub struct InteractionController {
    config: CanvasConfig,
    document: Document,
    sizer: GroupSizer,
    viewport: Viewport,
    canvas_state: CanvasState,
    dragging: Option<DraggingState>,
    /// Last screen location while scrolling the empty canvas.
    scroll_location: Option<Point>,
    editing: Option<EditingSession>,
    highlight: Option<Highlight>,
    guard: InteractionGuard,
}

impl InteractionController {
    pub fn new(document: Document, config: CanvasConfig) -> Self {
        let sizer = document.store.reducer().sizer().clone();
        let mut controller = Self {
            viewport: Viewport::new(&config),
            config,
            document,
            sizer,
            canvas_state: CanvasState::None,
            dragging: None,
            scroll_location: None,
            editing: None,
            highlight: None,
            guard: InteractionGuard::new(),
        };
        controller.refresh();
        controller
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn state(&self) -> &AppState {
        self.document.state()
    }

    pub fn page(&self) -> Option<&Page> {
        self.document.state().selected_page()
    }

    pub fn canvas_state(&self) -> &CanvasState {
        &self.canvas_state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn guard(&self) -> &InteractionGuard {
        &self.guard
    }

    /// The block being edited, with its live text.
    pub fn editing_item(&self) -> Option<&BlockItem> {
        self.editing.as_ref().map(|e| &e.item)
    }

    /// Where the dragged block or group is drawn, in document coordinates.
    pub fn dragged_frame(&self) -> Option<Rect> {
        self.dragging.as_ref().and_then(|d| d.dragged_frame)
    }

    /// A group hidden from the canvas because it is drawn at the dragged frame.
    pub fn hidden_group(&self) -> Option<GroupId> {
        match self.canvas_state {
            CanvasState::GroupDragging(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_selected(&self, group: GroupId) -> bool {
        self.state().selected_group == Some(group)
    }

    pub fn is_panning(&self) -> bool {
        self.dragging.is_some() || self.scroll_location.is_some()
    }

    /// Frame a group is drawn at, accounting for live text edits.
    pub fn group_frame(&self, group: &Group) -> Rect {
        self.sizer.sized_frame(group, self.editing_item())
    }

    /// Frames of a group's blocks, accounting for live text edits.
    pub fn block_frames(&self, group: &Group) -> Vec<(BlockId, Rect)> {
        self.sizer.block_frames(group, self.editing_item())
    }

    // Gestures

    /// Handle a press: highlight on touch down, tap on release.
    pub fn handle_press(&mut self, event: &PressEvent) {
        if self.is_panning() {
            self.clear_highlight();
            return;
        }
        let point = self.viewport.screen_to_document(event.location);
        match event.phase {
            GesturePhase::Began => self.highlight_at(point),
            GesturePhase::Changed => {}
            GesturePhase::Cancelled => self.clear_highlight(),
            GesturePhase::Ended => {
                self.clear_highlight();
                let Some(_token) = self.guard.enter() else {
                    return;
                };
                self.tap(point);
                self.refresh();
            }
        }
    }

    /// Handle a drag: moves blocks and groups, resizes groups, or scrolls
    /// the canvas when nothing is selected.
    pub fn handle_pan(&mut self, event: &PanEvent) {
        let point = self.viewport.screen_to_document(event.location);
        match event.phase {
            GesturePhase::Began => self.pan_began(point, event.location),
            GesturePhase::Changed => self.pan_changed(point, event.location),
            GesturePhase::Ended => self.pan_ended(),
            GesturePhase::Cancelled => self.pan_cancelled(),
        }
        self.refresh();
    }

    pub fn handle_pinch(&mut self, event: &PinchEvent) {
        if event.phase.is_active() {
            self.clear_highlight();
        }
        self.viewport.pinch(event);
    }

    // Commands

    /// Add a block to the selected group, or to a new group.
    pub fn add_block(&mut self, block_type: BlockType) -> Option<BlockId> {
        self.end_text_editing();
        let target = self
            .canvas_state
            .group_id()
            .filter(|id| self.page().is_some_and(|p| p.contains_group(*id)));
        let action = Action::add_block(block_type, target, None);
        let Action::AddBlock { block_id, .. } = &action else {
            return None;
        };
        let block_id = *block_id;
        let previous = self.state().clone();
        if !self.document.store.dispatch(action) {
            return None;
        }
        self.register_undo("Add Block", previous);
        if let Some(group) = self.state().selected_group {
            self.set_canvas_state(CanvasState::GroupSelected(group));
        }
        Some(block_id)
    }

    pub fn delete_block(&mut self, item: &BlockItem) -> bool {
        self.end_text_editing();
        let previous = self.state().clone();
        let deleted = self.document.store.dispatch(Action::DeleteBlock { item: item.clone() });
        if deleted {
            self.register_undo("Delete Block", previous);
        }
        self.refresh();
        deleted
    }

    pub fn delete_group(&mut self, group: GroupId) -> bool {
        self.end_text_editing();
        let previous = self.state().clone();
        let deleted = self.document.store.dispatch(Action::DeleteGroup { group });
        if deleted {
            self.register_undo("Delete Group", previous);
        }
        self.refresh();
        deleted
    }

    /// Delete the selected block, or the selected group.
    pub fn delete_selection(&mut self) -> bool {
        match self.canvas_state.clone() {
            CanvasState::BlockSelected(item) => self.delete_block(&item),
            CanvasState::GroupSelected(group) => self.delete_group(group),
            _ => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.end_text_editing();
        let done = self.document.undo();
        self.refresh();
        done
    }

    pub fn redo(&mut self) -> bool {
        self.end_text_editing();
        let done = self.document.redo();
        self.refresh();
        done
    }

    // Text editing

    fn begin_text_editing(&mut self, item: BlockItem) {
        self.editing = Some(EditingSession {
            unedited: item.block.clone(),
            original_state: self.state().clone(),
            item: item.clone(),
        });
        self.set_canvas_state(CanvasState::BlockTextEditing(item));
    }

    /// Replace the text of the block being edited.
    ///
    /// The group grows or shrinks with the text right away; the text itself
    /// is saved when editing ends.
    pub fn update_editing_text(&mut self, text: impl Into<String>) {
        let Some(session) = self.editing.as_mut() else {
            return;
        };
        if !session.item.block.is_text() {
            return;
        }
        session.item.block.text = text.into();
        let item = session.item.clone();

        let resized = self
            .page()
            .and_then(|page| page.group(item.group_id))
            .map(|group| (group.frame(), self.sizer.sized_frame(group, Some(&item))));
        if let Some((current, frame)) = resized {
            if frame != current {
                self.document.store.dispatch(Action::UpdateGroup {
                    group: item.group_id,
                    frame,
                    reposition: true,
                });
            }
        }
        self.canvas_state = CanvasState::BlockTextEditing(item);
    }

    /// Finish editing, saving the text if it changed.
    ///
    /// Text equal to the block's placeholder is stored as empty.
    pub fn end_text_editing(&mut self) {
        let Some(session) = self.editing.take() else {
            return;
        };
        let mut item = session.item;
        if !item.block.is_content_equal(&session.unedited) {
            let is_title = self
                .page()
                .and_then(|page| page.group(item.group_id))
                .is_some_and(|group| group.is_title_block(&item.block));
            if item.block.text == item.block.default_text() {
                item.block.text.clear();
            }
            self.register_undo(
                if is_title { "Change Title" } else { "Edit Text" },
                session.original_state,
            );
            self.document
                .store
                .dispatch(Action::UpdateBlockText { item: item.clone() });
        }
        let stored = self.page().and_then(|page| page.block_item(&item));
        self.set_canvas_state(CanvasState::BlockSelected(stored.unwrap_or(item)));
    }

    // Tapping

    fn tap(&mut self, point: Point) {
        let Some(page) = self.page() else {
            return;
        };
        let editing = self.editing.as_ref().map(|e| e.item.clone());
        if let Some((item, _)) = block_at(page, &self.sizer, point, editing.as_ref()) {
            self.did_tap_block(item);
        } else if let Some(group) = group_at(page, point, None).map(Group::id) {
            self.did_tap_group(group);
        } else if matches!(self.canvas_state, CanvasState::BlockTextEditing(_)) {
            self.end_text_editing();
        } else {
            self.clear_state();
        }
    }

    fn did_tap_group(&mut self, group: GroupId) {
        match self.canvas_state.clone() {
            CanvasState::None | CanvasState::GroupSelected(_) | CanvasState::BlockSelected(_) => {
                self.set_group_selected(group);
            }
            CanvasState::BlockTextEditing(_) => {
                self.end_text_editing();
                self.set_group_selected(group);
            }
            _ => {}
        }
    }

    fn did_tap_block(&mut self, item: BlockItem) {
        match self.canvas_state.clone() {
            CanvasState::None => self.set_group_selected(item.group_id),
            CanvasState::GroupSelected(selected) => {
                if selected == item.group_id {
                    self.set_canvas_state(CanvasState::BlockSelected(item));
                } else {
                    self.set_group_selected(item.group_id);
                }
            }
            CanvasState::BlockSelected(selected) => {
                if selected.block_id() == item.block_id() {
                    if item.block.is_text() {
                        self.begin_text_editing(item);
                    }
                } else if selected.group_id == item.group_id {
                    self.set_canvas_state(CanvasState::BlockSelected(item));
                } else {
                    self.set_group_selected(item.group_id);
                }
            }
            CanvasState::BlockTextEditing(editing) => {
                if editing.block_id() != item.block_id() {
                    self.end_text_editing();
                    if editing.group_id == item.group_id {
                        self.set_canvas_state(CanvasState::BlockSelected(item));
                    } else {
                        self.set_group_selected(item.group_id);
                    }
                }
            }
            _ => {}
        }
    }

    // Highlighting

    fn highlight_at(&mut self, point: Point) {
        let Some(page) = self.page() else {
            return;
        };
        let group = group_at(page, point, None).map(Group::id);
        let block = block_at(page, &self.sizer, point, None).map(|(item, _)| item);
        if !matches!(
            self.canvas_state,
            CanvasState::None | CanvasState::GroupSelected(_) | CanvasState::BlockSelected(_)
        ) {
            self.clear_highlight();
            return;
        }
        let selected_group = self.canvas_state.group_id();
        match (group, selected_group) {
            (None, None) => self.clear_highlight(),
            (None, Some(_)) => {}
            (Some(group), Some(selected)) if group == selected => {
                if let Some(item) = block {
                    self.highlight = Some(Highlight::Block(item));
                }
            }
            (Some(group), _) => self.highlight = Some(Highlight::Group(group)),
        }
    }

    fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    // Dragging

    fn pan_began(&mut self, point: Point, screen_location: Point) {
        self.clear_highlight();
        let mut dragging =
            DraggingState::new(self.state().clone(), self.canvas_state.clone(), point);
        match self.canvas_state.clone() {
            CanvasState::BlockSelected(item) => {
                self.set_canvas_state(CanvasState::BlockDraggingBegan(item));
            }
            CanvasState::GroupSelected(id) => {
                let Some(group) = self.page().and_then(|page| page.group(id)).cloned() else {
                    return;
                };
                let size = self.viewport.screen_length(self.config.handle_size);
                let threshold = self.viewport.screen_length(self.config.handle_hit_threshold);
                dragging.initial_frame = group.frame();
                let next = match handle_at(group.frame(), point, size, threshold) {
                    Some(handle) => CanvasState::GroupResizing(id, handle),
                    None => CanvasState::GroupDraggingBegan(id),
                };
                dragging.group = Some(group);
                self.set_canvas_state(next);
            }
            CanvasState::None => {
                self.scroll_location = Some(screen_location);
                return;
            }
            _ => return,
        }
        self.dragging = Some(dragging);
    }

    fn pan_changed(&mut self, point: Point, screen_location: Point) {
        if let Some(last) = self.scroll_location.replace(screen_location) {
            self.viewport.pan(screen_location - last);
            return;
        }
        let Some(mut dragging) = self.dragging.take() else {
            return;
        };
        match self.canvas_state.clone() {
            CanvasState::BlockDraggingBegan(item) => {
                if self.capture_block(&mut dragging, &item, point) {
                    dragging.target_position = dragging.original_position;
                    self.set_canvas_state(CanvasState::BlockDragging(item));
                }
            }
            CanvasState::BlockDragging(_) => {
                dragging.update_dragged_frame(point);
                self.update_block_position(&mut dragging);
            }
            CanvasState::GroupDraggingBegan(id) => {
                dragging.capture(dragging.initial_frame, point);
                self.set_canvas_state(CanvasState::GroupDragging(id));
            }
            CanvasState::GroupDragging(_) => {
                dragging.update_dragged_frame(point);
                self.update_group_position(&mut dragging);
            }
            CanvasState::GroupResizing(id, handle) => {
                self.resize_group(&mut dragging, id, handle, point);
            }
            _ => {}
        }
        self.dragging = Some(dragging);
    }

    fn pan_ended(&mut self) {
        self.scroll_location = None;
        let Some(mut dragging) = self.dragging.take() else {
            return;
        };
        match self.canvas_state.clone() {
            CanvasState::BlockDragging(item) => {
                let current = self.current_block(&item).unwrap_or(item);
                if dragging.target_position.is_none() {
                    self.promote_block(&dragging, current);
                } else {
                    self.set_canvas_state(CanvasState::BlockSelected(current));
                }
                self.register_drag_undo(&dragging, "Move Block");
            }
            CanvasState::GroupDragging(id) => {
                self.finish_group_move(&mut dragging, id);
                let merged = dragging.last_target_placement.as_ref().map(|p| p.item.group_id);
                match merged {
                    Some(target) => {
                        let added = self.page().and_then(|page| page.last_added_block.clone());
                        match added {
                            Some(item) => {
                                self.select_group_in_store(Some(item.group_id));
                                self.set_canvas_state(CanvasState::BlockSelected(item));
                            }
                            None => self.set_group_selected(target),
                        }
                    }
                    None => self.set_group_selected(id),
                }
                self.register_drag_undo(&dragging, "Move Group");
            }
            CanvasState::GroupResizing(id, _) => {
                let frame = self.page().and_then(|page| page.group(id)).map(Group::frame);
                if let Some(frame) = frame {
                    self.document.store.dispatch(Action::UpdateGroup {
                        group: id,
                        frame,
                        reposition: true,
                    });
                }
                self.register_drag_undo(&dragging, "Resize Group");
                self.set_canvas_state(dragging.previous_canvas_state.with_group(id));
            }
            _ => {
                let settled = self.settled_state(&dragging);
                self.set_canvas_state(settled);
            }
        }
    }

    /// Stop a drag without finishing it. Changes already dispatched stay,
    /// and still get an undo entry.
    fn pan_cancelled(&mut self) {
        self.scroll_location = None;
        let Some(dragging) = self.dragging.take() else {
            return;
        };
        log::debug!("drag cancelled in state {}", self.canvas_state.name());
        self.register_drag_undo(&dragging, "Move");
        let settled = self.settled_state(&dragging);
        self.set_canvas_state(settled);
    }

    /// The pre-drag canvas state, now about the dragged item as it is stored.
    fn settled_state(&self, dragging: &DraggingState) -> CanvasState {
        let previous = &dragging.previous_canvas_state;
        match &self.canvas_state {
            CanvasState::BlockDraggingBegan(item) | CanvasState::BlockDragging(item) => {
                let current = self.current_block(item).unwrap_or_else(|| item.clone());
                previous.with_block_item(current)
            }
            CanvasState::GroupDraggingBegan(id)
            | CanvasState::GroupDragging(id)
            | CanvasState::GroupResizing(id, _) => previous.with_group(*id),
            _ => previous.clone(),
        }
    }

    fn capture_block(&self, dragging: &mut DraggingState, item: &BlockItem, point: Point) -> bool {
        let Some(page) = self.page() else {
            return false;
        };
        let Some(group) = page.group(item.group_id) else {
            return false;
        };
        let frame = self
            .sizer
            .block_frames(group, None)
            .into_iter()
            .find(|(id, _)| *id == item.block_id())
            .map(|(_, frame)| frame);
        let Some(frame) = frame else {
            return false;
        };
        dragging.original_position = page.block_position(item);
        dragging.capture(frame, point);
        true
    }

    /// The stored version of a block item.
    fn current_block(&self, item: &BlockItem) -> Option<BlockItem> {
        self.page()?.block_item(item)
    }

    fn drop_target(
        &self,
        frame: Rect,
        hidden: Option<GroupId>,
        excluding: &[BlockId],
    ) -> Option<TargetBlockPlacement> {
        let page = self.page()?;
        let center = frame.center();
        let touch = self.viewport.screen_length(self.config.drop_target_size);
        let (item, block_frame) = closest_block(page, &self.sizer, center, touch, hidden, excluding)?;
        Some(TargetBlockPlacement::resolve(item, block_frame, center))
    }

    fn update_block_position(&mut self, dragging: &mut DraggingState) {
        let Some(frame) = dragging.dragged_frame else {
            return;
        };
        let Some(current) = self
            .canvas_state
            .block_item()
            .and_then(|item| self.current_block(item))
        else {
            return;
        };
        let Some(placement) = self.drop_target(frame, None, &[current.block_id()]) else {
            if dragging.target_position.is_some() {
                log::debug!("block {} has no drop target", current.block_id());
            }
            dragging.last_target_placement = None;
            dragging.target_position = None;
            return;
        };
        if dragging.last_target_placement.as_ref() == Some(&placement) {
            return;
        }
        dragging.last_target_placement = Some(placement.clone());

        let action = if placement.after {
            Action::MoveBlockAfter {
                item: current.clone(),
                target: placement.item,
            }
        } else {
            Action::MoveBlockBefore {
                item: current.clone(),
                target: placement.item,
            }
        };
        let moved = self.document.store.dispatch(action);
        let Some(page) = self.page() else {
            return;
        };
        match page.last_added_block.clone().filter(|_| moved) {
            Some(updated) => {
                dragging.target_position = page
                    .last_added_position
                    .or_else(|| page.block_position(&updated));
                self.canvas_state = CanvasState::BlockDragging(updated);
            }
            None => dragging.target_position = page.block_position(&current),
        }
    }

    fn update_group_position(&mut self, dragging: &mut DraggingState) {
        let (Some(frame), Some(group)) = (dragging.dragged_frame, dragging.group.clone()) else {
            return;
        };
        let excluding: Vec<BlockId> = group.blocks().iter().map(Block::id).collect();
        let Some(placement) = self.drop_target(frame, Some(group.id()), &excluding)
        else {
            if let Some(last) = dragging.last_target_placement.take() {
                self.document.store.dispatch(Action::DetachGroup {
                    group,
                    from: Some(last.item.group_id),
                });
            }
            return;
        };
        if dragging.last_target_placement.as_ref() == Some(&placement) {
            return;
        }
        if let Some(last) = &dragging.last_target_placement {
            if last.item.group_id != placement.item.group_id {
                self.document.store.dispatch(Action::DetachGroup {
                    group: group.clone(),
                    from: Some(last.item.group_id),
                });
            }
        }
        dragging.last_target_placement = Some(placement.clone());

        let action = if placement.after {
            Action::MoveGroupAfter {
                group,
                target: placement.item,
            }
        } else {
            Action::MoveGroupBefore {
                group,
                target: placement.item,
            }
        };
        self.document.store.dispatch(action);
    }

    /// Move the dropped group to where it was released.
    fn finish_group_move(&mut self, dragging: &mut DraggingState, id: GroupId) {
        let Some(frame) = dragging.dragged_frame else {
            return;
        };
        if frame == dragging.initial_frame {
            dragging.did_change_frame = false;
            return;
        }
        dragging.did_change_frame = true;
        let moved = self
            .page()
            .and_then(|page| page.group(id))
            .map(|group| group.frame().with_origin(frame.origin()));
        if let Some(frame) = moved {
            self.document.store.dispatch(Action::UpdateGroup {
                group: id,
                frame,
                reposition: true,
            });
        }
    }

    fn resize_group(
        &mut self,
        dragging: &mut DraggingState,
        id: GroupId,
        handle: HandlePosition,
        point: Point,
    ) {
        let Some(edge) = handle.horizontal_edge() else {
            return;
        };
        let Some(page) = self.page() else {
            return;
        };
        let Some(group) = page.group(id) else {
            return;
        };
        let frame = self.document.store.reducer().repositioner().resize_horizontally(
            page,
            id,
            dragging.initial_frame,
            edge,
            point.x - dragging.initial_point.x,
            self.config.min_group_width,
        );
        // text rewraps at the new width
        let mut resized = group.clone();
        resized.set_frame(frame);
        let frame = self.sizer.sized_frame(&resized, None);

        dragging.did_change_frame = frame != dragging.initial_frame;
        self.document.store.dispatch(Action::UpdateGroup {
            group: id,
            frame,
            reposition: false,
        });
    }

    /// Replace a block dropped away from every group with a new group at the drop frame.
    fn promote_block(&mut self, dragging: &DraggingState, item: BlockItem) {
        let Some(frame) = dragging.dragged_frame else {
            self.set_canvas_state(CanvasState::BlockSelected(item));
            return;
        };
        log::debug!("promoting block {} to a new group", item.block_id());
        self.document
            .store
            .dispatch(Action::DeleteBlock { item: item.clone() });
        let promoted = self
            .document
            .store
            .dispatch(Action::promote_block_to_group(item.block, frame));
        let group = self
            .page()
            .and_then(|page| page.last_added_block.as_ref())
            .map(|added| added.group_id)
            .filter(|_| promoted);
        match group {
            Some(group) => self.set_group_selected(group),
            None => self.clear_state(),
        }
    }

    fn register_drag_undo(&mut self, dragging: &DraggingState, name: &str) {
        if dragging.did_change_position() {
            self.register_undo(name, dragging.original_state.clone());
        }
    }

    fn register_undo(&mut self, name: &str, previous: AppState) {
        self.document.history.register(name, previous);
        self.document.mark_changed();
    }

    // State

    fn set_canvas_state(&mut self, state: CanvasState) {
        if state != self.canvas_state {
            log::debug!("canvas {} -> {}", self.canvas_state.name(), state.name());
        }
        self.canvas_state = state;
    }

    fn select_group_in_store(&mut self, group: Option<GroupId>) {
        self.document.store.dispatch(Action::SelectGroup { group });
    }

    fn set_group_selected(&mut self, group: GroupId) {
        self.set_canvas_state(CanvasState::GroupSelected(group));
        self.select_group_in_store(Some(group));
    }

    fn clear_state(&mut self) {
        self.set_canvas_state(CanvasState::None);
        self.select_group_in_store(None);
    }

    /// Bring the canvas state in line with the document.
    ///
    /// Runs after every handled gesture and command. Selections of deleted
    /// groups or blocks are dropped, selected blocks pick up their stored
    /// version, and a selection restored by undo is shown.
    fn refresh(&mut self) {
        if self.dragging.is_some() {
            return;
        }
        let Some(page) = self.page() else {
            return;
        };
        let selected = self.state().selected_group;
        let next = match &self.canvas_state {
            CanvasState::None => selected
                .filter(|id| page.contains_group(*id))
                .map(CanvasState::GroupSelected),
            CanvasState::BlockSelected(item) => match page.block_item(item) {
                Some(stored) if stored != *item => Some(CanvasState::BlockSelected(stored)),
                Some(_) => None,
                None => Some(CanvasState::None),
            },
            CanvasState::BlockTextEditing(item) => {
                (page.block_item(item).is_none()).then_some(CanvasState::None)
            }
            state => state
                .group_id()
                .filter(|id| !page.contains_group(*id))
                .map(|_| CanvasState::None),
        };
        match next {
            Some(CanvasState::None) => {
                self.editing = None;
                self.clear_state();
            }
            Some(CanvasState::GroupSelected(id)) => self.set_group_selected(id),
            Some(state) => self.set_canvas_state(state),
            None => {}
        }
    }

    /// Scroll so that `group` sits at the top of a viewport of `width`, centred horizontally.
    pub fn scroll_to_group(&mut self, group: GroupId, width: f64) {
        let Some(frame) = self.page().and_then(|page| page.group(group)).map(Group::frame) else {
            return;
        };
        let scale = self.viewport.scale();
        self.viewport.offset = Vec2::new(
            (width - frame.width() * scale) / 2.0 - frame.x0 * scale,
            -frame.y0 * scale,
        );
    }
}
