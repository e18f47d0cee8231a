//! Canvas interaction states.

use crate::model::{BlockItem, GroupId};

use super::handles::HandlePosition;

/// What the user is currently doing on the canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CanvasState {
    #[default]
    None,
    GroupSelected(GroupId),
    BlockSelected(BlockItem),
    BlockTextEditing(BlockItem),
    GroupDraggingBegan(GroupId),
    GroupDragging(GroupId),
    GroupResizing(GroupId, HandlePosition),
    BlockDraggingBegan(BlockItem),
    BlockDragging(BlockItem),
}

impl CanvasState {
    /// The group this state is about, if any.
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            CanvasState::None => None,
            CanvasState::GroupSelected(id)
            | CanvasState::GroupDraggingBegan(id)
            | CanvasState::GroupDragging(id)
            | CanvasState::GroupResizing(id, _) => Some(*id),
            CanvasState::BlockSelected(item)
            | CanvasState::BlockTextEditing(item)
            | CanvasState::BlockDraggingBegan(item)
            | CanvasState::BlockDragging(item) => Some(item.group_id),
        }
    }

    /// The block this state is about, if any.
    pub fn block_item(&self) -> Option<&BlockItem> {
        match self {
            CanvasState::BlockSelected(item)
            | CanvasState::BlockTextEditing(item)
            | CanvasState::BlockDraggingBegan(item)
            | CanvasState::BlockDragging(item) => Some(item),
            _ => None,
        }
    }

    /// Whether the state carries a whole group rather than a block.
    pub fn is_group_state(&self) -> bool {
        matches!(
            self,
            CanvasState::GroupSelected(_)
                | CanvasState::GroupDraggingBegan(_)
                | CanvasState::GroupDragging(_)
                | CanvasState::GroupResizing(..)
        )
    }

    /// The same kind of group state, now about `group`. Other states are returned as is.
    pub fn with_group(&self, group: GroupId) -> CanvasState {
        match self {
            CanvasState::GroupSelected(_) => CanvasState::GroupSelected(group),
            CanvasState::GroupDraggingBegan(_) => CanvasState::GroupDraggingBegan(group),
            CanvasState::GroupDragging(_) => CanvasState::GroupDragging(group),
            CanvasState::GroupResizing(_, handle) => CanvasState::GroupResizing(group, *handle),
            other => other.clone(),
        }
    }

    /// The same kind of block state, now about `item`. Other states are returned as is.
    pub fn with_block_item(&self, item: BlockItem) -> CanvasState {
        match self {
            CanvasState::BlockSelected(_) => CanvasState::BlockSelected(item),
            CanvasState::BlockTextEditing(_) => CanvasState::BlockTextEditing(item),
            CanvasState::BlockDraggingBegan(_) => CanvasState::BlockDraggingBegan(item),
            CanvasState::BlockDragging(_) => CanvasState::BlockDragging(item),
            other => other.clone(),
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CanvasState::None => "none",
            CanvasState::GroupSelected(_) => "groupSelected",
            CanvasState::BlockSelected(_) => "blockSelected",
            CanvasState::BlockTextEditing(_) => "blockTextEditing",
            CanvasState::GroupDraggingBegan(_) => "groupDraggingBegan",
            CanvasState::GroupDragging(_) => "groupDragging",
            CanvasState::GroupResizing(..) => "groupResizing",
            CanvasState::BlockDraggingBegan(_) => "blockDraggingBegan",
            CanvasState::BlockDragging(_) => "blockDragging",
        }
    }
}
