//! The reducer: applies an [`Action`] to an [`AppState`].
//!
//! Reduction never fails. When an action refers to a page, group or block that
//! does not exist, the input state is returned unchanged (apart from the
//! position delta, which is reset on every call).

use kurbo::{Rect, Size, Vec2};

use crate::action::Action;
use crate::config::CanvasConfig;
use crate::model::{
    AppState, Block, BlockFactory, BlockId, BlockItem, BlockPosition, BlockType, Group, GroupId,
    Page,
};
use crate::reposition::Repositioner;
use crate::sizing::GroupSizer;

/// Applies actions to document states.
#[derive(Debug, Clone)]
pub struct Reducer {
    sizer: GroupSizer,
    repositioner: Repositioner,
    factory: BlockFactory,
    min_group_width: f64,
}

impl Default for Reducer {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl Reducer {
    /// Create a reducer from a configuration.
    pub fn new(config: &CanvasConfig) -> Self {
        Self::with_sizer(config, GroupSizer::new(config))
    }

    /// Create a reducer that sizes groups with the given sizer.
    pub fn with_sizer(config: &CanvasConfig, sizer: GroupSizer) -> Self {
        Self {
            sizer,
            repositioner: Repositioner::new(config.group_spacing),
            factory: BlockFactory::new(config.spacer_height),
            min_group_width: config.min_group_width,
        }
    }

    pub fn sizer(&self) -> &GroupSizer {
        &self.sizer
    }

    pub fn repositioner(&self) -> &Repositioner {
        &self.repositioner
    }

    /// Apply an action, producing the next state.
    pub fn reduce(&self, state: &AppState, action: &Action) -> AppState {
        let mut base = state.clone();
        base.last_action_position_delta = Vec2::ZERO;
        match self.apply(&base, action) {
            Some(next) => next,
            None => {
                log::debug!("{} left the document unchanged", action.name());
                base
            }
        }
    }

    fn apply(&self, state: &AppState, action: &Action) -> Option<AppState> {
        match action {
            Action::AddBlock {
                block_type,
                group,
                position,
                block_id,
                new_group_id,
            } => self.add_block(state, *block_type, *group, *position, *block_id, *new_group_id),
            Action::DeleteBlock { item } => self.delete_block(state, item),
            Action::DeleteGroup { group } => self.delete_group(state, *group),
            Action::DeleteAllGroups => self.delete_all_groups(state),
            Action::MoveBlockBefore { item, target } => self.move_block(state, item, target, false),
            Action::MoveBlockAfter { item, target } => self.move_block(state, item, target, true),
            Action::MoveBlockIntoGroup { item, group } => {
                self.move_block_into_group(state, item, *group)
            }
            Action::MoveGroupBefore { group, target } => self.move_group(state, group, target, false),
            Action::MoveGroupAfter { group, target } => self.move_group(state, group, target, true),
            Action::DetachGroup { group, from } => self.detach_group(state, group, *from),
            Action::PromoteBlockToGroup {
                block,
                frame,
                new_group_id,
            } => self.promote_block_to_group(state, block, *frame, *new_group_id),
            Action::UpdateGroup {
                group,
                frame,
                reposition,
            } => self.update_group(state, *group, *frame, *reposition),
            Action::UpdateBlockText { item } => self.update_block_text(state, item),
            Action::SelectGroup { group } => self.select_group(state, *group),
            Action::ReplaceAppState { state: replacement } => {
                let mut next = (**replacement).clone();
                next.last_action_position_delta = Vec2::ZERO;
                Some(next)
            }
        }
    }

    fn default_frame(&self) -> Rect {
        Rect::from_origin_size(
            (0.0, 0.0),
            Size::new(self.min_group_width, self.min_group_width),
        )
    }

    fn add_block(
        &self,
        state: &AppState,
        block_type: BlockType,
        group: Option<GroupId>,
        position: Option<usize>,
        block_id: BlockId,
        new_group_id: GroupId,
    ) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        let block = self.factory.build_with_id(block_id, block_type);
        let affected = match group {
            Some(group_id) => {
                let mut group = page.group(group_id)?.clone();
                group.add_block(block, position);
                self.sizer.resize(&mut group);
                page.update_group(group);
                self.repositioner.reposition_groups(&mut page);
                group_id
            }
            None => {
                if page.contains_group(new_group_id) {
                    return None;
                }
                let mut group = Group::new(new_group_id, self.default_frame());
                group.add_block(block, position);
                self.sizer.resize(&mut group);
                page.add_group(group);
                self.repositioner.reposition_added(&mut page, new_group_id);
                new_group_id
            }
        };
        let mut next = with_page(state, page)?;
        next.selected_group = Some(affected);
        Some(next)
    }

    /// Removing a group's only block removes the group itself.
    fn delete_block(&self, state: &AppState, item: &BlockItem) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        let mut group = page.group(item.group_id)?.clone();
        if !group.contains_block(item.block_id()) {
            return None;
        }
        let mut next_selection = state.selected_group;
        if group.len() == 1 {
            page.delete_group(group.id());
            if next_selection == Some(group.id()) {
                next_selection = None;
            }
        } else {
            group.delete_block_avoiding(item.block_id(), |id| page.contains_block(id));
            self.sizer.resize(&mut group);
            page.update_group(group);
        }
        let mut next = with_page(state, page)?;
        next.selected_group = next_selection;
        Some(next)
    }

    fn delete_group(&self, state: &AppState, group_id: GroupId) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        page.delete_group(group_id)?;
        let mut next = with_page(state, page)?;
        if next.selected_group == Some(group_id) {
            next.selected_group = None;
        }
        Some(next)
    }

    fn delete_all_groups(&self, state: &AppState) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        page.clear_groups();
        page.clear_last_added();
        let mut next = with_page(state, page)?;
        next.selected_group = None;
        Some(next)
    }

    fn move_block(
        &self,
        state: &AppState,
        item: &BlockItem,
        target: &BlockItem,
        after: bool,
    ) -> Option<AppState> {
        if item.block_id() == target.block_id() {
            return None;
        }
        let mut page = state.selected_page()?.clone();
        let target_position = page.block_position(target)?;
        let mut source = page.group(item.group_id)?.clone();
        let source_position = source.block_index(item.block_id())?;
        let same_group = item.group_id == target.group_id;

        if same_group {
            let unchanged = if after {
                source_position == target_position.position + 1
            } else {
                target_position.position == source_position + 1
            };
            if unchanged {
                return None;
            }
        }

        // Within one group the block is re-inserted right away, so the title
        // block must not be replaced in between.
        let block = if same_group {
            source.take_block(item.block_id())?
        } else {
            source.delete_block_avoiding(item.block_id(), |id| page.contains_block(id))?
        };
        self.sizer.resize(&mut source);
        page.update_group(source);

        let mut target_group = page.group(target.group_id)?.clone();
        let index = target_group.block_index(target.block_id())?;
        let insert_at = if after { index + 1 } else { index };
        let added = target_group.add_block(block, Some(insert_at));
        self.sizer.resize(&mut target_group);
        page.update_group(target_group);
        self.repositioner.reposition_groups(&mut page);

        page.last_added_position = Some(added.block_position());
        page.last_added_block = Some(added.block_item);
        with_page(state, page)
    }

    fn move_block_into_group(
        &self,
        state: &AppState,
        item: &BlockItem,
        group_id: GroupId,
    ) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        let mut source = page.group(item.group_id)?.clone();
        page.group(group_id)?;

        let added = if item.group_id == group_id {
            let block = source.take_block(item.block_id())?;
            let added = source.add_block(block, None);
            self.sizer.resize(&mut source);
            page.update_group(source);
            added
        } else {
            let block =
                source.delete_block_avoiding(item.block_id(), |id| page.contains_block(id))?;
            self.sizer.resize(&mut source);
            page.update_group(source);
            let mut target = page.group(group_id)?.clone();
            let added = target.add_block(block, None);
            self.sizer.resize(&mut target);
            page.update_group(target);
            added
        };
        self.repositioner.reposition_groups(&mut page);

        page.last_added_position = Some(added.block_position());
        page.last_added_block = Some(added.block_item);
        with_page(state, page)
    }

    /// Merge `group` into the target's group, next to the target block.
    ///
    /// The merged group may already have been merged earlier in the same
    /// drag; its blocks are pulled out of the target first, so repeated
    /// merges only move them.
    fn move_group(
        &self,
        state: &AppState,
        group: &Group,
        target: &BlockItem,
        after: bool,
    ) -> Option<AppState> {
        if group.is_empty() || group.contains_block(target.block_id()) {
            return None;
        }
        if target.group_id == group.id() {
            return None;
        }
        let mut page = state.selected_page()?.clone();
        let mut target_group = page.group(target.group_id)?.clone();
        target_group.block_index(target.block_id())?;

        page.delete_group(group.id());
        for block in group.blocks() {
            target_group.take_block(block.id());
        }
        let index = target_group.block_index(target.block_id())?;
        let insert_at = if after { index + 1 } else { index };
        let mut last = None;
        for (offset, block) in group.blocks().iter().enumerate() {
            last = Some(target_group.add_block(block.clone(), Some(insert_at + offset)));
        }
        self.sizer.resize(&mut target_group);
        page.update_group(target_group);
        self.repositioner.reposition_groups(&mut page);

        if let Some(added) = last {
            page.last_added_position = Some(added.block_position());
            page.last_added_block = Some(added.block_item);
        }
        let mut next = with_page(state, page)?;
        if next.selected_group == Some(group.id()) {
            next.selected_group = Some(target.group_id);
        }
        Some(next)
    }

    fn detach_group(&self, state: &AppState, group: &Group, from: Option<GroupId>) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        if page.contains_group(group.id()) {
            return None;
        }
        if let Some(mut source) = from.and_then(|id| page.group(id).cloned()) {
            for block in group.blocks() {
                source.delete_block_avoiding(block.id(), |id| {
                    page.contains_block(id) || group.contains_block(id)
                });
            }
            self.sizer.resize(&mut source);
            page.update_group(source);
        }
        page.add_group(group.clone());
        with_page(state, page)
    }

    fn promote_block_to_group(
        &self,
        state: &AppState,
        block: &Block,
        frame: Rect,
        new_group_id: GroupId,
    ) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        let already_placed = page
            .groups()
            .iter()
            .any(|g| g.id() == new_group_id || g.contains_block(block.id()));
        if already_placed {
            return None;
        }
        let width = frame.width().max(self.min_group_width);
        let mut group = Group::new(
            new_group_id,
            Rect::from_origin_size(frame.origin(), Size::new(width, frame.height())),
        );
        let added = group.add_block(block.clone(), None);
        self.sizer.resize(&mut group);
        // keep the new group centred on where the block was dropped
        let grown = group.frame().height() - frame.height();
        group.set_frame(group.frame() - Vec2::new(0.0, grown / 2.0));
        page.add_group(group);

        page.last_added_position = Some(BlockPosition {
            group_id: new_group_id,
            position: 0,
        });
        page.last_added_block = Some(added.block_item);
        with_page(state, page)
    }

    fn update_group(
        &self,
        state: &AppState,
        group_id: GroupId,
        frame: Rect,
        reposition: bool,
    ) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        if !page.set_group_frame(group_id, frame) {
            return None;
        }
        let delta = if reposition {
            self.repositioner.reposition_moved(&mut page, group_id)
        } else {
            Vec2::ZERO
        };
        let mut next = with_page(state, page)?;
        next.last_action_position_delta = delta;
        Some(next)
    }

    fn update_block_text(&self, state: &AppState, item: &BlockItem) -> Option<AppState> {
        let mut page = state.selected_page()?.clone();
        if !page.update_block(item) {
            return None;
        }
        with_page(state, page)
    }

    fn select_group(&self, state: &AppState, group: Option<GroupId>) -> Option<AppState> {
        if let Some(id) = group {
            state.selected_page()?.group(id)?;
        }
        let mut next = state.clone();
        next.selected_group = group;
        Some(next)
    }
}

/// Copy of `state` with its selected page replaced.
fn with_page(state: &AppState, page: Page) -> Option<AppState> {
    let mut next = state.clone();
    *next.selected_page_mut()? = page;
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reposition::column_buckets;
    use uuid::Uuid;

    fn page(state: &AppState) -> &Page {
        state.selected_page().unwrap()
    }

    fn only_group(state: &AppState) -> &Group {
        let page = page(state);
        assert_eq!(page.groups().len(), 1);
        &page.groups()[0]
    }

    fn item_at(state: &AppState, group: usize, block: usize) -> BlockItem {
        let group = &page(state).groups()[group];
        BlockItem::new(group.id(), group.blocks()[block].clone())
    }

    /// State with one group holding the given block types.
    fn state_with_group(types: &[BlockType]) -> AppState {
        let reducer = Reducer::default();
        let mut state = reducer.reduce(&AppState::new(), &Action::add_block(types[0], None, None));
        let group_id = only_group(&state).id();
        for t in &types[1..] {
            state = reducer.reduce(&state, &Action::add_block(*t, Some(group_id), None));
        }
        state
    }

    fn assert_columns_separated(state: &AppState, spacing: f64) {
        let page = page(state);
        for bucket in column_buckets(page.groups()) {
            let mut frames: Vec<Rect> = bucket.iter().map(|&i| page.groups()[i].frame()).collect();
            frames.sort_by(|a, b| a.y0.total_cmp(&b.y0));
            for pair in frames.windows(2) {
                assert!(pair[0].y1 + spacing <= pair[1].y0 - spacing);
            }
        }
    }

    #[test]
    fn test_add_block_creates_group() {
        let reducer = Reducer::default();
        let state = reducer.reduce(&AppState::new(), &Action::add_block(BlockType::Label, None, None));
        let group = only_group(&state);
        assert_eq!(group.len(), 1);
        assert_eq!(group.frame().width(), 274.0);
        assert_eq!(group.frame().height(), 69.0);
        assert_eq!(state.selected_group, Some(group.id()));
    }

    #[test]
    fn test_add_block_new_group_goes_below_column() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let first = only_group(&state).frame();
        let state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let second = page(&state).groups()[1].frame();
        assert_eq!(second.y0, first.y1 + 32.0);
        assert_eq!(state.selected_group, Some(page(&state).groups()[1].id()));
    }

    #[test]
    fn test_add_block_into_group_at_position() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Body]);
        let group_id = only_group(&state).id();
        let action = Action::add_block(BlockType::Spacer, Some(group_id), Some(1));
        let Action::AddBlock { block_id, .. } = action else {
            unreachable!()
        };
        let state = reducer.reduce(&state, &action);
        let group = only_group(&state);
        assert_eq!(group.block_index(block_id), Some(1));
        assert_eq!(group.blocks()[1].height, 20.0);
    }

    #[test]
    fn test_add_block_grows_group_and_repacks() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let top = page(&state).groups()[0].id();
        for _ in 0..4 {
            state = reducer.reduce(&state, &Action::add_block(BlockType::Body, Some(top), None));
        }
        assert_columns_separated(&state, 32.0);
    }

    #[test]
    fn test_add_then_delete_round_trip() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let item = item_at(&state, 0, 0);
        let state = reducer.reduce(&state, &Action::DeleteBlock { item });
        assert!(page(&state).groups().is_empty());
        assert_eq!(state.selected_group, None);
    }

    #[test]
    fn test_delete_block_keeps_title() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Divider]);
        let item = item_at(&state, 0, 0);
        let state = reducer.reduce(&state, &Action::DeleteBlock { item: item.clone() });
        let group = only_group(&state);
        assert_eq!(group.len(), 2);
        assert!(group.blocks().iter().any(Block::is_text));
        assert!(!group.contains_block(item.block_id()));
    }

    #[test]
    fn test_delete_missing_block_is_noop() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let mut item = item_at(&state, 0, 0);
        item.block = BlockFactory::default().build(BlockType::Label);
        assert_eq!(reducer.reduce(&state, &Action::DeleteBlock { item }), state);
    }

    #[test]
    fn test_delete_group_and_all_groups() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let first = page(&state).groups()[0].id();

        let state = reducer.reduce(&state, &Action::DeleteGroup { group: first });
        assert_eq!(page(&state).groups().len(), 1);
        assert!(page(&state).group(first).is_none());

        let state = reducer.reduce(&state, &Action::DeleteAllGroups);
        assert!(page(&state).groups().is_empty());
        assert_eq!(state.selected_group, None);
    }

    #[test]
    fn test_move_block_before_within_group() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Body, BlockType::Spacer]);
        let spacer = item_at(&state, 0, 2);
        let body = item_at(&state, 0, 1);
        let state = reducer.reduce(
            &state,
            &Action::MoveBlockBefore {
                item: spacer.clone(),
                target: body,
            },
        );
        let group = only_group(&state);
        assert_eq!(group.block_index(spacer.block_id()), Some(1));
        assert_eq!(page(&state).last_added_position.map(|p| p.position), Some(1));
        assert_eq!(
            page(&state).last_added_block.as_ref().map(BlockItem::block_id),
            Some(spacer.block_id())
        );
    }

    #[test]
    fn test_move_block_before_next_is_noop() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Body]);
        let label = item_at(&state, 0, 0);
        let body = item_at(&state, 0, 1);
        let next = reducer.reduce(&state, &Action::MoveBlockBefore { item: label, target: body });
        assert_eq!(next, state);
    }

    #[test]
    fn test_move_block_after_previous_is_noop() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Body]);
        let label = item_at(&state, 0, 0);
        let body = item_at(&state, 0, 1);
        let next = reducer.reduce(&state, &Action::MoveBlockAfter { item: body, target: label });
        assert_eq!(next, state);
    }

    #[test]
    fn test_move_title_within_group_keeps_single_label() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Spacer]);
        let label = item_at(&state, 0, 0);
        let spacer = item_at(&state, 0, 1);
        let state = reducer.reduce(&state, &Action::MoveBlockAfter { item: label.clone(), target: spacer });
        let group = only_group(&state);
        assert_eq!(group.len(), 2);
        assert_eq!(group.block_index(label.block_id()), Some(1));
    }

    #[test]
    fn test_move_block_after_into_other_group() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Body]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let body = item_at(&state, 0, 1);
        let other_label = item_at(&state, 1, 0);

        let state = reducer.reduce(
            &state,
            &Action::MoveBlockAfter {
                item: body.clone(),
                target: other_label.clone(),
            },
        );

        let page = page(&state);
        assert_eq!(page.groups()[0].len(), 1);
        let target = page.group(other_label.group_id).unwrap();
        assert_eq!(target.block_index(body.block_id()), Some(1));
        assert_eq!(
            page.last_added_block.as_ref().map(|i| i.group_id),
            Some(other_label.group_id)
        );
        assert_columns_separated(&state, 32.0);
    }

    #[test]
    fn test_move_last_text_block_out_inserts_title() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Spacer]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let label = item_at(&state, 0, 0);
        let target = item_at(&state, 1, 0);

        let state = reducer.reduce(&state, &Action::MoveBlockBefore { item: label, target });

        let source = &page(&state).groups()[0];
        assert_eq!(source.len(), 2);
        assert!(source.blocks()[0].is_text());
    }

    #[test]
    fn test_move_block_into_group() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Body]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let body = item_at(&state, 0, 1);
        let target = page(&state).groups()[1].id();

        let state = reducer.reduce(
            &state,
            &Action::MoveBlockIntoGroup {
                item: body.clone(),
                group: target,
            },
        );

        let group = page(&state).group(target).unwrap();
        assert_eq!(group.block_index(body.block_id()), Some(1));
        assert_eq!(page(&state).groups()[0].len(), 1);
    }

    #[test]
    fn test_moves_between_groups_keep_block_ids_unique() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Spacer]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let second = page(&state).groups()[1].id();
        state = reducer.reduce(&state, &Action::add_block(BlockType::Spacer, Some(second), None));
        let first = page(&state).groups()[0].id();
        let a = item_at(&state, 0, 0).block_id();
        let b = item_at(&state, 1, 0).block_id();

        let find = |state: &AppState, id: BlockId| {
            let group = page(state).groups().iter().find(|g| g.contains_block(id)).unwrap();
            BlockItem::new(group.id(), group.block(id).unwrap().clone())
        };
        for (block, group) in [(a, second), (b, first), (a, first)] {
            let item = find(&state, block);
            state = reducer.reduce(&state, &Action::MoveBlockIntoGroup { item, group });
        }

        let ids: Vec<BlockId> = page(&state)
            .groups()
            .iter()
            .flat_map(|g| g.blocks().iter().map(Block::id))
            .collect();
        let unique: std::collections::HashSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 6);
        assert_eq!(unique.len(), 6);
        for group in page(&state).groups() {
            assert!(group.blocks()[0].is_text());
        }
    }

    #[test]
    fn test_move_group_before_merges_in_order() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Body]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let second = page(&state).groups()[1].id();
        state = reducer.reduce(&state, &Action::add_block(BlockType::Spacer, Some(second), None));

        let dragged = page(&state).groups()[0].clone();
        let target = item_at(&state, 1, 1);
        let state = reducer.reduce(
            &state,
            &Action::MoveGroupBefore {
                group: dragged.clone(),
                target: target.clone(),
            },
        );

        let page = page(&state);
        assert_eq!(page.groups().len(), 1);
        let merged = page.group(second).unwrap();
        let ids: Vec<_> = merged.blocks().iter().map(Block::id).collect();
        assert_eq!(
            ids,
            vec![
                merged.blocks()[0].id(),
                dragged.blocks()[0].id(),
                dragged.blocks()[1].id(),
                target.block_id(),
            ]
        );
        assert_eq!(
            page.last_added_block.as_ref().map(BlockItem::block_id),
            Some(dragged.blocks()[1].id())
        );
        assert_eq!(page.last_added_position.map(|p| p.position), Some(2));
    }

    #[test]
    fn test_move_group_after_last_block_appends_in_order() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Body]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let dragged = page(&state).groups()[0].clone();
        let target = item_at(&state, 1, 0);

        let state = reducer.reduce(
            &state,
            &Action::MoveGroupAfter {
                group: dragged.clone(),
                target: target.clone(),
            },
        );

        let merged = page(&state).group(target.group_id).unwrap();
        assert_eq!(merged.blocks()[1].id(), dragged.blocks()[0].id());
        assert_eq!(merged.blocks()[2].id(), dragged.blocks()[1].id());
    }

    #[test]
    fn test_move_then_detach_group_restores_blocks() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label, BlockType::Body]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let dragged = page(&state).groups()[0].clone();
        let target = item_at(&state, 1, 0);

        let merged = reducer.reduce(
            &state,
            &Action::MoveGroupBefore {
                group: dragged.clone(),
                target: target.clone(),
            },
        );
        let detached = reducer.reduce(
            &merged,
            &Action::DetachGroup {
                group: dragged.clone(),
                from: Some(target.group_id),
            },
        );

        let page = page(&detached);
        assert_eq!(page.groups().len(), 2);
        assert_eq!(page.group(dragged.id()).unwrap().blocks(), dragged.blocks());
        assert_eq!(page.group(target.group_id).unwrap().len(), 1);
    }

    #[test]
    fn test_detach_group_already_on_page_is_noop() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let group = only_group(&state).clone();
        let next = reducer.reduce(&state, &Action::DetachGroup { group, from: None });
        assert_eq!(next, state);
    }

    #[test]
    fn test_promote_block_to_group_recentres() {
        let reducer = Reducer::default();
        let mut block = BlockFactory::default().build(BlockType::Spacer);
        block.height = 200.0;
        let frame = Rect::new(100.0, 100.0, 374.0, 150.0);
        let state = reducer.reduce(&AppState::new(), &Action::promote_block_to_group(block.clone(), frame));

        let group = only_group(&state);
        assert_eq!(group.frame().height(), 200.0);
        // grew by 150, so moved up by 75
        assert_eq!(group.frame().y0, 25.0);
        assert_eq!(group.frame().x0, 100.0);
        let page = page(&state);
        assert_eq!(page.last_added_position.map(|p| p.position), Some(0));
        assert_eq!(page.last_added_block.as_ref().map(|i| i.group_id), Some(group.id()));
    }

    #[test]
    fn test_promote_block_still_on_page_is_noop() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let item = item_at(&state, 0, 0);
        let next = reducer.reduce(&state, &Action::promote_block_to_group(item.block, Rect::ZERO));
        assert_eq!(next, state);
    }

    #[test]
    fn test_update_group_records_shift() {
        let reducer = Reducer::default();
        let mut state = state_with_group(&[BlockType::Label]);
        state = reducer.reduce(&state, &Action::add_block(BlockType::Label, None, None));
        let first = page(&state).groups()[0].clone();
        let second = page(&state).groups()[1].clone();

        // drag the second group above the first
        let frame = second.frame().with_origin((0.0, -60.0));
        let state = reducer.reduce(
            &state,
            &Action::UpdateGroup {
                group: second.id(),
                frame,
                reposition: true,
            },
        );

        // wants y = 0 - 32 - 69 = -101
        assert_eq!(state.last_action_position_delta, Vec2::new(0.0, 101.0));
        assert_eq!(page(&state).group(second.id()).unwrap().frame().y0, 0.0);
        assert_eq!(page(&state).group(first.id()).unwrap().frame().y0, 101.0);

        let after = reducer.reduce(&state, &Action::SelectGroup { group: None });
        assert_eq!(after.last_action_position_delta, Vec2::ZERO);
    }

    #[test]
    fn test_update_group_without_reposition() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let group = only_group(&state).clone();
        let frame = group.frame().with_origin((300.0, 400.0));
        let state = reducer.reduce(
            &state,
            &Action::UpdateGroup {
                group: group.id(),
                frame,
                reposition: false,
            },
        );
        assert_eq!(only_group(&state).frame(), frame);
        assert_eq!(state.last_action_position_delta, Vec2::ZERO);
    }

    #[test]
    fn test_update_block_text() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let mut item = item_at(&state, 0, 0);
        item.block.text = "Shopping".into();
        let state = reducer.reduce(&state, &Action::UpdateBlockText { item: item.clone() });
        assert_eq!(only_group(&state).blocks()[0].text, "Shopping");
    }

    #[test]
    fn test_select_unknown_group_is_noop() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label]);
        let next = reducer.reduce(
            &state,
            &Action::SelectGroup {
                group: Some(Uuid::new_v4()),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_replace_app_state() {
        let reducer = Reducer::default();
        let before = state_with_group(&[BlockType::Label]);
        let after = reducer.reduce(&before, &Action::DeleteAllGroups);
        let restored = reducer.reduce(&after, &Action::replace_app_state(before.clone()));
        assert_eq!(restored, before);
    }

    #[test]
    fn test_reduce_is_pure() {
        let reducer = Reducer::default();
        let state = state_with_group(&[BlockType::Label, BlockType::Body, BlockType::Spacer]);
        let actions = vec![
            Action::add_block(BlockType::Label, None, None),
            Action::add_block(BlockType::Body, Some(only_group(&state).id()), Some(0)),
            Action::DeleteBlock {
                item: item_at(&state, 0, 0),
            },
            Action::MoveBlockAfter {
                item: item_at(&state, 0, 0),
                target: item_at(&state, 0, 2),
            },
            Action::promote_block_to_group(
                BlockFactory::default().build(BlockType::Media),
                Rect::new(0.0, 0.0, 274.0, 50.0),
            ),
        ];
        for action in &actions {
            assert_eq!(reducer.reduce(&state, action), reducer.reduce(&state, action));
        }
    }
}
