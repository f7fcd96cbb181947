#![forbid(unsafe_code)]

//! Saving and loading [`LayoutDocument`]s as JSON files.
//!
//! # Atomic Writes
//!
//! Writes use a temp-file-then-rename pattern so a crash mid-write never
//! leaves a truncated document behind.

use std::io;
use std::path::Path;

use panelwall_layout::{LayoutConfig, LayoutDocument, LayoutModelError};

use crate::drag::DragPolicy;
use crate::editor::WallEditor;

const TRACE_TARGET: &str = "panelwall.persistence";

/// Write `document` to `path` as pretty JSON.
///
/// The parent directory must already exist.
pub fn save_document(path: impl AsRef<Path>, document: &LayoutDocument) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(document).map_err(PersistenceError::Json)?;

    let temp = path.with_extension("json.tmp");
    std::fs::write(&temp, json).map_err(PersistenceError::Io)?;
    std::fs::rename(&temp, path).map_err(PersistenceError::Io)?;

    tracing::debug!(
        target: TRACE_TARGET,
        path = %path.display(),
        blocks = document.blocks.len(),
        "saved layout document"
    );
    Ok(())
}

/// Read a document and check its schema version.
///
/// Block-level validation happens when the document is turned into a wall.
pub fn load_document(path: impl AsRef<Path>) -> Result<LayoutDocument, PersistenceError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(PersistenceError::Io)?;
    let document: LayoutDocument =
        serde_json::from_str(&contents).map_err(PersistenceError::Json)?;
    document.validate_schema().map_err(PersistenceError::Model)?;
    tracing::debug!(
        target: TRACE_TARGET,
        path = %path.display(),
        schema_version = document.schema_version,
        blocks = document.blocks.len(),
        "loaded layout document"
    );
    Ok(document)
}

/// Load a document and restore an editor from it.
pub fn load_editor(
    path: impl AsRef<Path>,
    layout: LayoutConfig,
    drag: DragPolicy,
) -> Result<WallEditor, PersistenceError> {
    let document = load_document(path)?;
    WallEditor::from_document(&document, layout, drag).map_err(PersistenceError::Model)
}

/// Errors from saving or loading layout documents.
#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Json(serde_json::Error),
    /// The document parsed but does not describe a valid wall.
    Model(LayoutModelError),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Model(e) => write!(f, "invalid layout document: {e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Model(e) => Some(e),
        }
    }
}
