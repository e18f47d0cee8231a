//! Documents: a store, its undo history and the on-disk encoding.
//!
//! A document is the JSON encoding of an [`AppState`], stored in files with
//! the [`DOCUMENT_EXTENSION`] extension.

use thiserror::Error;

use crate::config::CanvasConfig;
use crate::history::UndoHistory;
use crate::model::AppState;
use crate::reducer::Reducer;
use crate::store::Store;

/// File extension of saved documents.
pub const DOCUMENT_EXTENSION: &str = "lbox";

/// Type identifier of saved documents.
pub const DOCUMENT_TYPE: &str = "app.lunchbox.document";

/// Reasons a document cannot be read or written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The content is not a document of this kind.
    #[error("The file is in an unrecognised format")]
    UnrecognizedContent,
    /// The content looks like a document but cannot be decoded.
    #[error("The file could not be read: {0}")]
    CorruptDocument(String),
    /// The state could not be encoded.
    #[error("The document could not be saved: {0}")]
    ArchivingFailure(String),
}

/// Whether a type name identifies a document.
///
/// Both the type identifier and the bare file extension are accepted.
pub fn is_document_type(type_name: &str) -> bool {
    type_name == DOCUMENT_TYPE || type_name.eq_ignore_ascii_case(DOCUMENT_EXTENSION)
}

/// Encode a state to document bytes.
pub fn encode_state(state: &AppState) -> Result<Vec<u8>, DocumentError> {
    let bytes = serde_json::to_vec_pretty(state)
        .map_err(|e| DocumentError::ArchivingFailure(e.to_string()))?;
    if bytes.is_empty() {
        return Err(DocumentError::ArchivingFailure("empty output".to_string()));
    }
    Ok(bytes)
}

/// Decode document bytes into a state.
///
/// Whether the content is a document at all is decided by its type name in
/// [`Document::open`]. Bytes that fail to decode, including invalid or
/// truncated UTF-8, are a corrupt document.
pub fn decode_state(bytes: &[u8]) -> Result<AppState, DocumentError> {
    serde_json::from_slice(bytes).map_err(|e| DocumentError::CorruptDocument(e.to_string()))
}

/// An open document.
#[derive(Debug)]
pub struct Document {
    pub store: Store,
    pub history: UndoHistory,
    changed: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl Document {
    /// Create an empty document.
    pub fn new(config: &CanvasConfig) -> Self {
        Self::with_state(AppState::new(), config)
    }

    /// Create a document around an existing state.
    pub fn with_state(state: AppState, config: &CanvasConfig) -> Self {
        Self {
            store: Store::new(state, Reducer::new(config)),
            history: UndoHistory::new(config.max_undo_history),
            changed: false,
        }
    }

    /// Open a document from its contents.
    ///
    /// `type_name`, when given, must name the document type.
    pub fn open(
        bytes: &[u8],
        type_name: Option<&str>,
        config: &CanvasConfig,
    ) -> Result<Self, DocumentError> {
        if let Some(type_name) = type_name {
            if !is_document_type(type_name) {
                log::warn!("refusing to open content of type {}", type_name);
                return Err(DocumentError::UnrecognizedContent);
            }
        }
        let state = decode_state(bytes).inspect_err(|e| log::error!("failed to open document: {}", e))?;
        log::info!("opened document {}", state.id());
        Ok(Self::with_state(state, config))
    }

    /// Encode the current state.
    pub fn contents(&self) -> Result<Vec<u8>, DocumentError> {
        encode_state(self.store.current_state())
    }

    pub fn state(&self) -> &AppState {
        self.store.current_state()
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn has_changes(&self) -> bool {
        self.changed
    }

    /// Clear the change flag, returning whether it was set.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Undo the last change. Returns true if undo was performed.
    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.store);
        if done {
            self.changed = true;
        }
        done
    }

    /// Redo the last undone change. Returns true if redo was performed.
    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.store);
        if done {
            self.changed = true;
        }
        done
    }
}
