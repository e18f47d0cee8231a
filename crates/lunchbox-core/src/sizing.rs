//! Group sizing.
//!
//! Computes the height a group needs for its blocks. Text is measured through
//! [`TextMeasure`] so that a render layer with real font metrics can plug in;
//! [`EstimatedTextMeasure`] is a deterministic stand-in used by default.

use std::fmt;
use std::sync::Arc;

use kurbo::{Point, Rect, Size};

use crate::config::CanvasConfig;
use crate::geometry::half_point_aligned;
use crate::model::{Block, BlockId, BlockItem, Group};

/// Horizontal inset of text inside a text block.
const TEXT_SIDE_MARGINS: f64 = 17.0;
/// Vertical inset of text inside a text block.
const TEXT_VERTICAL_MARGINS: f64 = 20.0;
/// Extra width the text container gets beyond its insets.
const TEXT_WIDTH_SLACK: f64 = 5.0;
const TITLE_MIN_HEIGHT: f64 = 69.0;
const TEXT_MIN_HEIGHT: f64 = 56.0;

/// Font metrics of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub line_height: f64,
}

impl TextStyle {
    pub const TITLE: TextStyle = TextStyle {
        font_size: 24.0,
        line_height: 28.8,
    };
    pub const LABEL: TextStyle = TextStyle {
        font_size: 14.0,
        line_height: 16.0,
    };
    pub const BODY: TextStyle = TextStyle {
        font_size: 14.0,
        line_height: 18.0,
    };
}

/// Measures laid-out text height.
pub trait TextMeasure: fmt::Debug + Send + Sync {
    /// Height of `text` wrapped to `width` in the given style.
    fn height(&self, text: &str, style: TextStyle, width: f64) -> f64;
}

/// Estimates text height from character counts.
///
/// Every paragraph takes at least one line; longer paragraphs wrap assuming a
/// fixed average glyph width relative to the font size.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedTextMeasure {
    /// Average glyph width as a fraction of the font size.
    pub glyph_width_ratio: f64,
}

impl Default for EstimatedTextMeasure {
    fn default() -> Self {
        Self {
            glyph_width_ratio: 0.55,
        }
    }
}

impl TextMeasure for EstimatedTextMeasure {
    fn height(&self, text: &str, style: TextStyle, width: f64) -> f64 {
        let glyph_width = style.font_size * self.glyph_width_ratio;
        let per_line = (width / glyph_width).floor().max(1.0);
        let lines: f64 = text
            .split('\n')
            .map(|paragraph| {
                let chars = paragraph.chars().count() as f64;
                (chars / per_line).ceil().max(1.0)
            })
            .sum();
        lines * style.line_height
    }
}

/// Computes group and block heights.
#[derive(Debug, Clone)]
pub struct GroupSizer {
    block_spacing: f64,
    side_margins: f64,
    min_height: f64,
    measure: Arc<dyn TextMeasure>,
}

impl Default for GroupSizer {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl GroupSizer {
    /// Create a sizer using the estimated text measure.
    pub fn new(config: &CanvasConfig) -> Self {
        Self::with_measure(config, Arc::new(EstimatedTextMeasure::default()))
    }

    /// Create a sizer with a custom text measure.
    pub fn with_measure(config: &CanvasConfig, measure: Arc<dyn TextMeasure>) -> Self {
        Self {
            block_spacing: config.block_spacing,
            side_margins: config.side_margins,
            min_height: config.min_group_height,
            measure,
        }
    }

    /// Width available to blocks inside a group of the given width.
    pub fn content_width(&self, group_width: f64) -> f64 {
        group_width - 2.0 * self.side_margins
    }

    /// Height of a single block laid out in `group`.
    ///
    /// When `editing` refers to this block, its live text is measured as is,
    /// without falling back to the placeholder.
    pub fn block_height(&self, block: &Block, group: &Group, editing: Option<&BlockItem>) -> f64 {
        let editing_block = editing.filter(|item| item.block_id() == block.id());
        let block = editing_block.map_or(block, |item| &item.block);
        if !block.is_text() {
            return block.height;
        }
        let is_title = group.is_title_block(block);
        let text = if editing_block.is_some() {
            block.text.as_str()
        } else {
            block.text_or_default()
        };
        let width = self.content_width(group.frame().width()) - 2.0 * TEXT_SIDE_MARGINS
            + TEXT_WIDTH_SLACK;
        let text_height = if is_title {
            self.measure.height(text, TextStyle::TITLE, width)
        } else {
            let (label, body) = match text.split_once('\n') {
                Some((label, body)) => (label, body),
                None => (text, ""),
            };
            let mut height = self.measure.height(label, TextStyle::LABEL, width);
            if !body.is_empty() {
                height += self.measure.height(body, TextStyle::BODY, width);
            }
            height
        };
        let min = if is_title { TITLE_MIN_HEIGHT } else { TEXT_MIN_HEIGHT };
        (text_height + 2.0 * TEXT_VERTICAL_MARGINS).max(min)
    }

    /// Height the group needs for its blocks, floored at the minimum height.
    pub fn height(&self, group: &Group, editing: Option<&BlockItem>) -> f64 {
        let blocks = group.blocks();
        let mut result: f64 = blocks
            .iter()
            .map(|b| self.block_height(b, group, editing))
            .sum();
        if blocks.len() > 1 {
            result += self.block_spacing * (blocks.len() - 1) as f64;
            result += 2.0 * self.side_margins;
        }
        half_point_aligned(result.max(self.min_height))
    }

    /// Frame width with the computed height.
    pub fn size(&self, group: &Group, editing: Option<&BlockItem>) -> Size {
        Size::new(
            half_point_aligned(group.frame().width()),
            self.height(group, editing),
        )
    }

    /// The group's frame with its height replaced by the computed height.
    pub fn sized_frame(&self, group: &Group, editing: Option<&BlockItem>) -> Rect {
        Rect::from_origin_size(group.frame().origin(), self.size(group, editing))
    }

    /// Resize a group in place so its stored frame matches its content.
    pub fn resize(&self, group: &mut Group) {
        let frame = self.sized_frame(group, None);
        group.set_frame(frame);
    }

    /// Frames of each block in document coordinates.
    pub fn block_frames(&self, group: &Group, editing: Option<&BlockItem>) -> Vec<(BlockId, Rect)> {
        let frame = group.frame();
        let x = frame.x0 + self.side_margins;
        let width = self.content_width(frame.width()).max(0.0);
        let mut y = frame.y0;
        if group.len() > 1 {
            y += self.side_margins;
        }
        let mut frames = Vec::with_capacity(group.len());
        for block in group.blocks() {
            let height = self.block_height(block, group, editing);
            frames.push((
                block.id(),
                Rect::from_origin_size(Point::new(x, y), Size::new(width, height)),
            ));
            y += height + self.block_spacing;
        }
        frames
    }
}
