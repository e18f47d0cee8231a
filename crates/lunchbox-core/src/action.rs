//! Actions: the closed set of document mutations.
//!
//! Every id an action introduces is chosen when the action is built, so
//! reducing the same action twice yields the same state.

use kurbo::Rect;
use uuid::Uuid;

use crate::model::{AppState, Block, BlockId, BlockItem, BlockType, Group, GroupId};

/// A document mutation, applied by [`crate::reducer::Reducer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add a block to a group, or to a new group when `group` is `None`.
    AddBlock {
        block_type: BlockType,
        group: Option<GroupId>,
        position: Option<usize>,
        block_id: BlockId,
        new_group_id: GroupId,
    },
    DeleteBlock {
        item: BlockItem,
    },
    DeleteGroup {
        group: GroupId,
    },
    DeleteAllGroups,
    MoveBlockBefore {
        item: BlockItem,
        target: BlockItem,
    },
    MoveBlockAfter {
        item: BlockItem,
        target: BlockItem,
    },
    /// Move a block to the end of another group.
    MoveBlockIntoGroup {
        item: BlockItem,
        group: GroupId,
    },
    /// Merge every block of `group` into the target's group, above the target.
    MoveGroupBefore {
        group: Group,
        target: BlockItem,
    },
    /// Merge every block of `group` into the target's group, below the target.
    MoveGroupAfter {
        group: Group,
        target: BlockItem,
    },
    /// Put a previously merged group back on the page.
    DetachGroup {
        group: Group,
        from: Option<GroupId>,
    },
    /// Wrap a single block in a new group placed around `frame`.
    PromoteBlockToGroup {
        block: Block,
        frame: Rect,
        new_group_id: GroupId,
    },
    UpdateGroup {
        group: GroupId,
        frame: Rect,
        reposition: bool,
    },
    UpdateBlockText {
        item: BlockItem,
    },
    SelectGroup {
        group: Option<GroupId>,
    },
    ReplaceAppState {
        state: Box<AppState>,
    },
}

impl Action {
    /// Add a block of `block_type`, generating the ids it needs.
    pub fn add_block(block_type: BlockType, group: Option<GroupId>, position: Option<usize>) -> Self {
        Action::AddBlock {
            block_type,
            group,
            position,
            block_id: Uuid::new_v4(),
            new_group_id: Uuid::new_v4(),
        }
    }

    /// Promote a block into its own group, generating the group id.
    pub fn promote_block_to_group(block: Block, frame: Rect) -> Self {
        Action::PromoteBlockToGroup {
            block,
            frame,
            new_group_id: Uuid::new_v4(),
        }
    }

    pub fn replace_app_state(state: AppState) -> Self {
        Action::ReplaceAppState {
            state: Box::new(state),
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddBlock { .. } => "AddBlock",
            Action::DeleteBlock { .. } => "DeleteBlock",
            Action::DeleteGroup { .. } => "DeleteGroup",
            Action::DeleteAllGroups => "DeleteAllGroups",
            Action::MoveBlockBefore { .. } => "MoveBlockBefore",
            Action::MoveBlockAfter { .. } => "MoveBlockAfter",
            Action::MoveBlockIntoGroup { .. } => "MoveBlockIntoGroup",
            Action::MoveGroupBefore { .. } => "MoveGroupBefore",
            Action::MoveGroupAfter { .. } => "MoveGroupAfter",
            Action::DetachGroup { .. } => "DetachGroup",
            Action::PromoteBlockToGroup { .. } => "PromoteBlockToGroup",
            Action::UpdateGroup { .. } => "UpdateGroup",
            Action::UpdateBlockText { .. } => "UpdateBlockText",
            Action::SelectGroup { .. } => "SelectGroup",
            Action::ReplaceAppState { .. } => "ReplaceAppState",
        }
    }
}
