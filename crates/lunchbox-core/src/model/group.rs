//! Groups: independently placed containers of ordered blocks.

use std::collections::HashMap;

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::block::{Block, BlockFactory, BlockId, BlockItem, BlockPosition, BlockType};
use crate::geometry::half_point_aligned_rect;

/// Unique identifier for groups.
pub type GroupId = Uuid;

/// Default edge length of a new group's frame.
pub const DEFAULT_GROUP_SIZE: f64 = 274.0;

/// Where a block landed after being added to a group.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedBlock {
    pub block_item: BlockItem,
    pub position: usize,
}

impl AddedBlock {
    pub fn block_position(&self) -> BlockPosition {
        BlockPosition {
            group_id: self.block_item.group_id,
            position: self.position,
        }
    }
}

/// A rectangular container of blocks, positioned on a page.
///
/// Blocks are ordered top to bottom. The id index is rebuilt after every
/// mutation of the block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroupRecord")]
pub struct Group {
    id: GroupId,
    frame: Rect,
    blocks: Vec<Block>,
    #[serde(skip)]
    index: HashMap<BlockId, usize>,
}

/// Serialized form of a group, before the block index is built.
#[derive(Deserialize)]
struct GroupRecord {
    id: GroupId,
    frame: Rect,
    #[serde(default)]
    blocks: Vec<Block>,
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        let mut group = Self {
            id: record.id,
            frame: record.frame,
            blocks: record.blocks,
            index: HashMap::new(),
        };
        group.rebuild_index();
        group
    }
}

impl Group {
    /// Create an empty group with the given frame.
    pub fn new(id: GroupId, frame: Rect) -> Self {
        Self {
            id,
            frame: half_point_aligned_rect(frame),
            blocks: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty group at the origin with the default square frame.
    pub fn with_default_frame(id: GroupId) -> Self {
        Self::new(
            id,
            Rect::from_origin_size(
                (0.0, 0.0),
                Size::new(DEFAULT_GROUP_SIZE, DEFAULT_GROUP_SIZE),
            ),
        )
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Replace the frame, aligned to half units.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = half_point_aligned_rect(frame);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.index.get(&id).map(|&i| &self.blocks[i])
    }

    pub fn block_index(&self, id: BlockId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn block_item(&self, id: BlockId) -> Option<BlockItem> {
        self.block(id).map(|b| BlockItem::new(self.id, b.clone()))
    }

    /// The title block is the first text-capable block.
    pub fn title_block(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.is_text())
    }

    pub fn is_title_block(&self, block: &Block) -> bool {
        self.title_block().is_some_and(|t| t.id == block.id)
    }

    /// Insert a block at `position`, or append it when the position is
    /// missing or past the end.
    pub fn add_block(&mut self, block: Block, position: Option<usize>) -> AddedBlock {
        let position = match position {
            Some(pos) if pos < self.blocks.len() => {
                self.blocks.insert(pos, block.clone());
                pos
            }
            _ => {
                self.blocks.push(block.clone());
                self.blocks.len() - 1
            }
        };
        self.rebuild_index();
        AddedBlock {
            block_item: BlockItem::new(self.id, block),
            position,
        }
    }

    /// Replace a block in place, matched by id. Returns false when absent.
    pub fn replace_block(&mut self, block: Block) -> bool {
        match self.index.get(&block.id) {
            Some(&i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    /// Remove a block.
    ///
    /// When the last text block goes, a default label takes its place at the
    /// top so the group keeps a title. The replacement id is derived from this
    /// group's id and the removed block's id, keeping the operation
    /// deterministic.
    pub fn delete_block(&mut self, id: BlockId) -> Option<Block> {
        self.delete_block_avoiding(id, |_| false)
    }

    /// Remove a block like [`Group::delete_block`], skipping any replacement
    /// title id for which `taken` returns true.
    pub(crate) fn delete_block_avoiding(
        &mut self,
        id: BlockId,
        taken: impl Fn(BlockId) -> bool,
    ) -> Option<Block> {
        let index = self.index.get(&id).copied()?;
        let removed = self.blocks.remove(index);
        if !self.blocks.iter().any(Block::is_text) {
            let mut title_id = Uuid::new_v5(&self.id, removed.id.as_bytes());
            while title_id == removed.id || self.index.contains_key(&title_id) || taken(title_id) {
                title_id = Uuid::new_v5(&title_id, b"title");
            }
            let title = BlockFactory::default().build_with_id(title_id, BlockType::Label);
            self.blocks.insert(0, title);
        }
        self.rebuild_index();
        Some(removed)
    }

    /// Remove a block without restoring a title block.
    pub(crate) fn take_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.index.get(&id).copied()?;
        let removed = self.blocks.remove(index);
        self.rebuild_index();
        Some(removed)
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i))
            .collect();
    }

    /// One-line summary for diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "Group({} frame=({}, {}, {}x{}) blocks={})",
            self.id,
            self.frame.x0,
            self.frame.y0,
            self.frame.width(),
            self.frame.height(),
            self.blocks.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(t: BlockType) -> Block {
        BlockFactory::default().build(t)
    }

    #[test]
    fn test_add_block_appends_past_end() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let a = group.add_block(block(BlockType::Label), None);
        let b = group.add_block(block(BlockType::Body), Some(10));
        assert_eq!(a.position, 0);
        assert_eq!(b.position, 1);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_add_block_inserts_at_position() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        group.add_block(block(BlockType::Label), None);
        group.add_block(block(BlockType::Body), None);
        let spacer = block(BlockType::Spacer);
        let added = group.add_block(spacer.clone(), Some(1));
        assert_eq!(added.position, 1);
        assert_eq!(group.block_index(spacer.id()), Some(1));
        assert_eq!(added.block_item.group_id, group.id());
    }

    #[test]
    fn test_delete_last_text_block_inserts_title() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let label = block(BlockType::Label);
        group.add_block(label.clone(), None);

        group.delete_block(label.id());

        assert_eq!(group.len(), 1);
        assert!(group.blocks()[0].is_text());
        assert_ne!(group.blocks()[0].id(), label.id());
    }

    #[test]
    fn test_delete_title_keeps_other_content_below() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let label = block(BlockType::Label);
        let divider = block(BlockType::Divider);
        group.add_block(label.clone(), None);
        group.add_block(divider.clone(), None);

        group.delete_block(label.id());

        assert_eq!(group.len(), 2);
        assert_eq!(group.blocks()[0].block_type, BlockType::Label);
        assert_eq!(group.blocks()[1].id(), divider.id());
    }

    #[test]
    fn test_delete_with_remaining_text_block() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let label = block(BlockType::Label);
        let body = block(BlockType::Body);
        group.add_block(label.clone(), None);
        group.add_block(body.clone(), None);

        group.delete_block(label.id());

        assert_eq!(group.len(), 1);
        assert!(group.is_title_block(&body));
    }

    #[test]
    fn test_delete_is_deterministic() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        group.add_block(block(BlockType::Label), None);
        let id = group.blocks()[0].id();
        let mut a = group.clone();
        let mut b = group.clone();
        a.delete_block(id);
        b.delete_block(id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_replacement_titles_differ_between_groups() {
        let label = block(BlockType::Label);
        let mut first = Group::with_default_frame(Uuid::new_v4());
        let mut second = Group::with_default_frame(Uuid::new_v4());
        first.add_block(label.clone(), None);
        second.add_block(label.clone(), None);

        first.delete_block(label.id());
        second.delete_block(label.id());

        assert_ne!(first.blocks()[0].id(), second.blocks()[0].id());
    }

    #[test]
    fn test_replacement_title_skips_taken_ids() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let label = block(BlockType::Label);
        group.add_block(label.clone(), None);
        let mut first = group.clone();
        first.delete_block(label.id());
        let taken = first.blocks()[0].id();

        group.delete_block_avoiding(label.id(), |id| id == taken);

        assert!(group.blocks()[0].is_text());
        assert_ne!(group.blocks()[0].id(), taken);
    }

    #[test]
    fn test_delete_missing_block() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        group.add_block(block(BlockType::Label), None);
        assert!(group.delete_block(Uuid::new_v4()).is_none());
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_title_block_is_first_text_block() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let spacer = block(BlockType::Spacer);
        let body = block(BlockType::Body);
        let label = block(BlockType::Label);
        group.add_block(spacer.clone(), None);
        group.add_block(body.clone(), None);
        group.add_block(label.clone(), None);
        assert!(group.is_title_block(&body));
        assert!(!group.is_title_block(&label));
        assert!(!group.is_title_block(&spacer));
    }

    #[test]
    fn test_frame_is_half_point_aligned() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        group.set_frame(Rect::new(0.2, 10.3, 274.2, 100.0));
        assert_eq!(group.frame().x0, 0.0);
        assert_eq!(group.frame().y0, 10.5);
    }

    #[test]
    fn test_deserialize_rebuilds_index() {
        let mut group = Group::with_default_frame(Uuid::new_v4());
        let label = block(BlockType::Label);
        group.add_block(label.clone(), None);
        let json = serde_json::to_string(&group).unwrap();
        let back: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(back.block(label.id()), Some(&label));
        assert_eq!(back, group);
    }
}
