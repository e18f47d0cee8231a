//! Periodic saving of the open document.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::model::AppState;
use crate::storage::{FileStorage, Storage, StorageResult};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key under which the most recently saved document is mirrored.
pub const LAST_DOCUMENT_KEY: &str = "__last_document__";

/// Saves a document when it has unsaved changes and the interval has passed.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    /// Id the document is saved under. Defaults to the state's own id.
    current_doc_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            current_doc_id: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Pick up the document's change flag.
    pub fn track(&mut self, document: &mut Document) {
        if document.take_changed() {
            self.dirty = true;
        }
    }

    pub fn set_document_id(&mut self, id: Option<String>) {
        self.current_doc_id = id;
    }

    pub fn document_id(&self) -> Option<&str> {
        self.current_doc_id.as_deref()
    }

    /// Whether there are unsaved changes and the interval has elapsed.
    pub fn should_save(&self) -> bool {
        self.dirty && self.last_save.is_none_or(|last| last.elapsed() >= self.interval)
    }

    /// Save if [`should_save`](Self::should_save). Returns whether a save happened.
    pub async fn maybe_save(&mut self, state: &AppState) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(state).await?;
        Ok(true)
    }

    /// Save immediately, also mirroring the state under [`LAST_DOCUMENT_KEY`].
    pub async fn save(&mut self, state: &AppState) -> StorageResult<()> {
        let doc_id = self
            .current_doc_id
            .clone()
            .unwrap_or_else(|| state.id().to_string());

        self.storage.save(&doc_id, state).await?;
        self.storage.save(LAST_DOCUMENT_KEY, state).await?;

        log::debug!("autosaved {}", doc_id);
        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(())
    }

    pub async fn load(&mut self, id: &str) -> StorageResult<AppState> {
        let state = self.storage.load(id).await?;
        self.current_doc_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(state)
    }

    /// Load the most recently saved document, if any.
    pub async fn load_last(&mut self) -> Option<AppState> {
        match self.storage.load(LAST_DOCUMENT_KEY).await {
            Ok(state) => {
                self.current_doc_id = Some(state.id().to_string());
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(state)
            }
            Err(e) => {
                log::warn!("no last document to restore: {}", e);
                None
            }
        }
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Saved document ids, without the last-document mirror.
    pub async fn list_documents(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_DOCUMENT_KEY);
        Ok(ids)
    }

    pub async fn exists(&self, id: &str) -> StorageResult<bool> {
        self.storage.exists(id).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Storage used when the host does not supply one.
pub type PlatformStorage = FileStorage;

pub type PlatformAutoSaveManager = AutoSaveManager<PlatformStorage>;

/// File storage in the default location.
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(FileStorage::default_location()?))
}

pub fn create_autosave_manager() -> StorageResult<PlatformAutoSaveManager> {
    Ok(AutoSaveManager::new(create_default_storage()?))
}
