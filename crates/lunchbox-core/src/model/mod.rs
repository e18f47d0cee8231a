//! Document model: blocks, groups, pages and the application state.

mod block;
mod group;
mod page;
mod state;

pub use block::{Block, BlockFactory, BlockId, BlockItem, BlockPosition, BlockType};
pub use group::{AddedBlock, DEFAULT_GROUP_SIZE, Group, GroupId};
pub use page::{Page, PageId, Tag};
pub use state::AppState;
