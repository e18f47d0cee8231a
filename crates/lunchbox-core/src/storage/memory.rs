//! In-memory storage.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::model::AppState;

/// Keeps documents in memory. Useful for tests and scratch documents.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, AppState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, state: &AppState) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let state = state.clone();
        Box::pin(async move {
            self.documents.write().map_err(lock_error)?.insert(id, state);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<AppState>> {
        let id = id.to_string();
        Box::pin(async move {
            let documents = self.documents.read().map_err(lock_error)?;
            documents
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.documents.write().map_err(lock_error)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let documents = self.documents.read().map_err(lock_error)?;
            Ok(documents.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let documents = self.documents.read().map_err(lock_error)?;
            Ok(documents.contains_key(&id))
        })
    }
}
