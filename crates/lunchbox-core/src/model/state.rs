//! Whole-document state.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::{Group, GroupId};
use super::page::{Page, PageId};

/// The complete document state held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AppStateRecord")]
pub struct AppState {
    pub(crate) id: Uuid,
    pages: Vec<Page>,
    #[serde(rename = "selectedPageId")]
    selected_page_id: PageId,
    #[serde(rename = "selectedGroup", skip_serializing_if = "Option::is_none")]
    pub selected_group: Option<GroupId>,
    /// Canvas shift caused by the most recent action.
    #[serde(skip)]
    pub last_action_position_delta: Vec2,
}

#[derive(Deserialize)]
struct AppStateRecord {
    id: Uuid,
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default, rename = "selectedPageId")]
    selected_page_id: Option<PageId>,
    #[serde(default, rename = "selectedGroup")]
    selected_group: Option<GroupId>,
}

impl From<AppStateRecord> for AppState {
    fn from(record: AppStateRecord) -> Self {
        let mut pages = record.pages;
        if pages.is_empty() {
            pages.push(Page::default());
        }
        let selected_page_id = record
            .selected_page_id
            .filter(|id| pages.iter().any(|p| p.id() == *id))
            .unwrap_or_else(|| pages[0].id());
        Self {
            id: record.id,
            pages,
            selected_page_id,
            selected_group: record.selected_group,
            last_action_position_delta: Vec2::ZERO,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create a document with a single empty page.
    pub fn new() -> Self {
        Self::with_page(Page::default())
    }

    /// Create a document holding the given page.
    pub fn with_page(page: Page) -> Self {
        let selected_page_id = page.id();
        Self {
            id: Uuid::new_v4(),
            pages: vec![page],
            selected_page_id,
            selected_group: None,
            last_action_position_delta: Vec2::ZERO,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == id)
    }

    pub fn selected_page_id(&self) -> PageId {
        self.selected_page_id
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.page(self.selected_page_id)
    }

    pub fn selected_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.selected_page_id;
        self.pages.iter_mut().find(|p| p.id() == id)
    }

    /// Select a page. Returns false when the page is unknown.
    pub fn select_page(&mut self, id: PageId) -> bool {
        if self.page(id).is_none() {
            return false;
        }
        self.selected_page_id = id;
        self.selected_group = None;
        true
    }

    /// Append a page.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// The selected group on the selected page, if it still exists.
    pub fn selected_group(&self) -> Option<&Group> {
        let id = self.selected_group?;
        self.selected_page()?.group(id)
    }

    /// Summary for diagnostics.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "AppState({} pages={} selected_group={:?} delta=({}, {}))",
            self.id,
            self.pages.len(),
            self.selected_group,
            self.last_action_position_delta.x,
            self.last_action_position_delta.y
        );
        if let Some(page) = self.selected_page() {
            out.push('\n');
            out.push_str(&page.describe());
        }
        out
    }
}
