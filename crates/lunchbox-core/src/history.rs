//! Snapshot-based undo and redo.

use crate::action::Action;
use crate::model::AppState;
use crate::store::Store;

/// Default number of undo entries kept.
pub const DEFAULT_MAX_UNDO_HISTORY: usize = 50;

/// A named document snapshot.
#[derive(Debug, Clone)]
struct HistoryEntry {
    name: String,
    state: AppState,
}

/// Undo and redo stacks of whole-document snapshots.
///
/// Undoing and redoing replace the store's state through
/// [`Action::ReplaceAppState`], so observers see the change like any other.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_HISTORY)
    }
}

impl UndoHistory {
    /// Create a history keeping at most `max_entries` undo steps.
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record the state as it was before a change (call before dispatching).
    pub fn register(&mut self, name: impl Into<String>, previous: AppState) {
        let name = name.into();
        log::debug!("undo registered: {}", name);
        self.undo_stack.push(HistoryEntry {
            name,
            state: previous,
        });
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Restore the most recent snapshot.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, store: &mut Store) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("undo: {}", entry.name);
        self.redo_stack.push(HistoryEntry {
            name: entry.name,
            state: store.current_state().clone(),
        });
        store.dispatch(Action::replace_app_state(entry.state));
        true
    }

    /// Reapply the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, store: &mut Store) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("redo: {}", entry.name);
        self.undo_stack.push(HistoryEntry {
            name: entry.name,
            state: store.current_state().clone(),
        });
        store.dispatch(Action::replace_app_state(entry.state));
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Name of the change the next undo reverts.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.name.as_str())
    }

    /// Name of the change the next redo reapplies.
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.name.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
