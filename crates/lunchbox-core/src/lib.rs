//! Lunchbox Core
//!
//! Document model, layout engine and gesture handling for the Lunchbox
//! freeform canvas. Documents are pages of groups laid out on an unbounded
//! canvas; each group stacks blocks of text, media and data vertically.
//!
//! State changes go through [`Action`]s applied by the [`Reducer`] inside a
//! [`Store`]. The [`InteractionController`] turns host gestures into actions
//! and keeps the undo history.

pub mod action;
pub mod config;
pub mod document;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod model;
pub mod reducer;
pub mod reposition;
pub mod sizing;
pub mod storage;
pub mod store;

pub use action::Action;
pub use config::{CanvasConfig, ConfigError};
pub use document::{DOCUMENT_EXTENSION, DOCUMENT_TYPE, Document, DocumentError};
pub use history::{DEFAULT_MAX_UNDO_HISTORY, UndoHistory};
pub use interaction::{CanvasState, InteractionController, Viewport};
pub use model::{AppState, Block, BlockFactory, BlockId, BlockItem, BlockType, Group, GroupId, Page};
pub use reducer::Reducer;
pub use reposition::Repositioner;
pub use sizing::{GroupSizer, TextMeasure};
pub use store::{Store, Subscription};
