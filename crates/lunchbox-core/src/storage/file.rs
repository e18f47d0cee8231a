//! One `.lbox` file per document in a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::{DOCUMENT_EXTENSION, decode_state, encode_state};
use crate::model::AppState;

/// Stores documents as files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create file storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::Io(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;
        Ok(Self { base_path })
    }

    /// File storage under the user's data directory, e.g.
    /// `~/.local/share/lunchbox/documents` on Linux.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("lunchbox").join("documents"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.{}", safe_id, DOCUMENT_EXTENSION))
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, state: &AppState) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        let encoded = encode_state(state);
        Box::pin(async move {
            let bytes = encoded?;
            fs::write(&path, bytes).map_err(|e| {
                log::error!("failed to write {}: {}", path.display(), e);
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::info!("saved {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<AppState>> {
        let path = self.document_path(id);
        let id = id.to_string();
        Box::pin(async move {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => {
                    return Err(StorageError::Io(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    )));
                }
            };
            let state = decode_state(&bytes).inspect_err(|e| {
                log::error!("failed to decode {}: {}", path.display(), e);
            })?;
            log::info!("loaded {}", path.display());
            Ok(state)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(format!(
                    "Failed to delete {}: {}",
                    path.display(),
                    e
                ))),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries = match fs::read_dir(&base) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
                Err(e) => {
                    return Err(StorageError::Io(format!("Failed to read directory: {}", e)));
                }
            };
            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}
