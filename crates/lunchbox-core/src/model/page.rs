//! Pages: ordered collections of groups.

use std::collections::HashMap;

use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::block::{BlockId, BlockItem, BlockPosition};
use super::group::{Group, GroupId};
use crate::geometry::union_all;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// A label attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A page of groups.
///
/// `last_added_block` and `last_added_position` are transient hints written
/// by reducers that move content around, so callers can find where a block
/// landed. They are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PageRecord")]
pub struct Page {
    id: PageId,
    #[serde(rename = "parentPath")]
    pub parent_path: Vec<PageId>,
    pub title: String,
    pub notes: String,
    pub tags: Vec<Tag>,
    groups: Vec<Group>,
    #[serde(skip)]
    index: HashMap<GroupId, usize>,
    #[serde(skip)]
    pub last_added_block: Option<BlockItem>,
    #[serde(skip)]
    pub last_added_position: Option<BlockPosition>,
}

#[derive(Deserialize)]
struct PageRecord {
    id: PageId,
    #[serde(default, rename = "parentPath")]
    parent_path: Vec<PageId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    groups: Vec<Group>,
}

impl From<PageRecord> for Page {
    fn from(record: PageRecord) -> Self {
        let mut page = Self {
            id: record.id,
            parent_path: record.parent_path,
            title: record.title,
            notes: record.notes,
            tags: record.tags,
            groups: record.groups,
            index: HashMap::new(),
            last_added_block: None,
            last_added_position: None,
        };
        page.rebuild_index();
        page
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Uuid::new_v4())
    }
}

impl Page {
    /// Create an empty top-level page.
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            parent_path: Vec::new(),
            title: String::new(),
            notes: String::new(),
            tags: Vec::new(),
            groups: Vec::new(),
            index: HashMap::new(),
            last_added_block: None,
            last_added_position: None,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.index.get(&id).map(|&i| &self.groups[i])
    }

    pub fn group_index(&self, id: GroupId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains_group(&self, id: GroupId) -> bool {
        self.index.contains_key(&id)
    }

    /// Whether any group on the page holds the block.
    pub fn contains_block(&self, id: BlockId) -> bool {
        self.groups.iter().any(|g| g.contains_block(id))
    }

    /// Append a group.
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
        self.rebuild_index();
    }

    /// Replace a stored group with the same id. Returns false when absent.
    pub fn update_group(&mut self, group: Group) -> bool {
        match self.index.get(&group.id()) {
            Some(&i) => {
                self.groups[i] = group;
                true
            }
            None => false,
        }
    }

    /// Replace only the frame of a stored group.
    pub fn set_group_frame(&mut self, id: GroupId, frame: Rect) -> bool {
        match self.index.get(&id) {
            Some(&i) => {
                self.groups[i].set_frame(frame);
                true
            }
            None => false,
        }
    }

    pub fn delete_group(&mut self, id: GroupId) -> Option<Group> {
        let i = self.index.get(&id).copied()?;
        let removed = self.groups.remove(i);
        self.rebuild_index();
        Some(removed)
    }

    pub fn clear_groups(&mut self) {
        self.groups.clear();
        self.rebuild_index();
    }

    /// Current position of a block within its group.
    pub fn block_position(&self, item: &BlockItem) -> Option<BlockPosition> {
        let group = self.group(item.group_id)?;
        let position = group.block_index(item.block_id())?;
        Some(BlockPosition {
            group_id: item.group_id,
            position,
        })
    }

    /// Look up the stored version of a block item.
    pub fn block_item(&self, item: &BlockItem) -> Option<BlockItem> {
        self.group(item.group_id)?.block_item(item.block_id())
    }

    /// Replace a block with the item's block. Returns false when absent.
    pub fn update_block(&mut self, item: &BlockItem) -> bool {
        match self.index.get(&item.group_id) {
            Some(&i) => self.groups[i].replace_block(item.block.clone()),
            None => false,
        }
    }

    /// Bounding rectangle of every group.
    pub fn bounds(&self) -> Option<Rect> {
        union_all(self.groups.iter().map(Group::frame))
    }

    /// Move every group by `offset`.
    pub fn offset_all_groups(&mut self, offset: Vec2) {
        for group in &mut self.groups {
            let frame = group.frame() + offset;
            group.set_frame(frame);
        }
    }

    pub(crate) fn clear_last_added(&mut self) {
        self.last_added_block = None;
        self.last_added_position = None;
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id(), i))
            .collect();
    }

    /// Multi-line summary for diagnostics.
    pub fn describe(&self) -> String {
        let mut out = format!("Page({} {:?} groups={})", self.id, self.title, self.groups.len());
        for group in &self.groups {
            out.push_str("\n  ");
            out.push_str(&group.describe());
        }
        out
    }
}
