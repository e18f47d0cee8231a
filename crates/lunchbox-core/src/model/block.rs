//! Blocks: the smallest unit of content inside a group.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GroupId;

/// Unique identifier for blocks.
pub type BlockId = Uuid;

/// The kind of content a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    // System
    Spacer,
    // Simple content
    Label,
    Body,
    LabelBody,
    Divider,
    Action,
    Link,
    List,
    Media,
    // Data
    Property,
    DisplayProperty,
    ChangeProperty,
    Toggle,
}

impl BlockType {
    /// Every block type, in palette order.
    pub const ALL: [BlockType; 13] = [
        BlockType::Spacer,
        BlockType::Label,
        BlockType::Body,
        BlockType::LabelBody,
        BlockType::Divider,
        BlockType::Action,
        BlockType::Link,
        BlockType::List,
        BlockType::Media,
        BlockType::Property,
        BlockType::DisplayProperty,
        BlockType::ChangeProperty,
        BlockType::Toggle,
    ];

    /// Types offered for plain content.
    pub const SIMPLE: [BlockType; 8] = [
        BlockType::Label,
        BlockType::LabelBody,
        BlockType::Body,
        BlockType::Divider,
        BlockType::Action,
        BlockType::Link,
        BlockType::List,
        BlockType::Media,
    ];

    /// Types bound to document data.
    pub const DATA: [BlockType; 4] = [
        BlockType::Property,
        BlockType::DisplayProperty,
        BlockType::ChangeProperty,
        BlockType::Toggle,
    ];

    /// Whether blocks of this type hold editable text and can act as a title.
    pub fn is_text(self) -> bool {
        matches!(self, BlockType::Label | BlockType::Body | BlockType::LabelBody)
    }

    /// Placeholder shown for an empty text block.
    pub fn default_text(self) -> &'static str {
        match self {
            BlockType::Label => "Title",
            BlockType::Body => "Body text",
            BlockType::LabelBody => "Label\nBody text",
            _ => "",
        }
    }

    /// Stable name used in logs and action titles.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Spacer => "spacer",
            BlockType::Label => "label",
            BlockType::Body => "body",
            BlockType::LabelBody => "labelBody",
            BlockType::Divider => "divider",
            BlockType::Action => "action",
            BlockType::Link => "link",
            BlockType::List => "list",
            BlockType::Media => "media",
            BlockType::Property => "property",
            BlockType::DisplayProperty => "displayProperty",
            BlockType::ChangeProperty => "changeProperty",
            BlockType::Toggle => "toggle",
        }
    }
}

/// A single piece of content.
///
/// Two blocks are the same block when their ids match; `PartialEq` compares
/// full values so that whole document states can be compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Fixed height, used by non-text types.
    pub height: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "mediaURL", skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl Block {
    /// Create a new block with the given id.
    pub fn new(id: BlockId, block_type: BlockType, height: f64) -> Self {
        Self {
            id,
            block_type,
            height,
            text: String::new(),
            media_url: None,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn is_text(&self) -> bool {
        self.block_type.is_text()
    }

    /// Placeholder text for this block's type.
    pub fn default_text(&self) -> &'static str {
        self.block_type.default_text()
    }

    /// The block's text, falling back to the placeholder when empty.
    pub fn text_or_default(&self) -> &str {
        if self.text.is_empty() {
            self.default_text()
        } else {
            &self.text
        }
    }

    /// Whether the user-visible content matches, ignoring identity.
    pub fn is_content_equal(&self, other: &Block) -> bool {
        self.text == other.text && self.media_url == other.media_url
    }

    /// One-line summary for diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "Block({} {} h={} text={:?})",
            self.block_type.name(),
            self.id,
            self.height,
            self.text
        )
    }
}

/// Builds blocks with per-type defaults.
#[derive(Debug, Clone, Copy)]
pub struct BlockFactory {
    spacer_height: f64,
}

impl Default for BlockFactory {
    fn default() -> Self {
        Self { spacer_height: 20.0 }
    }
}

impl BlockFactory {
    /// Create a factory that gives spacers the given height.
    pub fn new(spacer_height: f64) -> Self {
        Self { spacer_height }
    }

    /// Build a block of the given type with a fresh id.
    pub fn build(&self, block_type: BlockType) -> Block {
        self.build_with_id(Uuid::new_v4(), block_type)
    }

    /// Build a block of the given type with a caller-chosen id.
    pub fn build_with_id(&self, id: BlockId, block_type: BlockType) -> Block {
        match block_type {
            BlockType::Spacer => Block::new(id, block_type, self.spacer_height),
            _ => Block::new(id, block_type, 0.0),
        }
    }
}

/// A block together with the group that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockItem {
    pub group_id: GroupId,
    pub block: Block,
}

impl BlockItem {
    pub fn new(group_id: GroupId, block: Block) -> Self {
        Self { group_id, block }
    }

    pub fn block_id(&self) -> BlockId {
        self.block.id
    }

    /// Whether both items refer to the same block in the same group.
    pub fn is_same_item(&self, other: &BlockItem) -> bool {
        self.group_id == other.group_id && self.block.id == other.block.id
    }
}

/// Index of a block within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPosition {
    pub group_id: GroupId,
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_types() {
        let text: Vec<_> = BlockType::ALL.iter().filter(|t| t.is_text()).collect();
        assert_eq!(
            text,
            vec![&BlockType::Label, &BlockType::Body, &BlockType::LabelBody]
        );
    }

    #[test]
    fn test_factory_spacer_height() {
        let factory = BlockFactory::default();
        assert_eq!(factory.build(BlockType::Spacer).height, 20.0);
        assert_eq!(factory.build(BlockType::Label).height, 0.0);
    }

    #[test]
    fn test_text_or_default() {
        let factory = BlockFactory::default();
        let mut block = factory.build(BlockType::Label);
        assert_eq!(block.text_or_default(), "Title");
        block.text = "Groceries".to_string();
        assert_eq!(block.text_or_default(), "Groceries");

        let divider = factory.build(BlockType::Divider);
        assert_eq!(divider.text_or_default(), "");
    }

    #[test]
    fn test_content_equality_ignores_identity() {
        let factory = BlockFactory::default();
        let a = factory.build(BlockType::Body);
        let b = factory.build(BlockType::Body);
        assert!(a.is_content_equal(&b));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_serde_field_names() {
        let block = BlockFactory::default().build(BlockType::LabelBody);
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"type\":\"labelBody\""));
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
