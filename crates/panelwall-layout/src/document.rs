//! Persisted layout shape.

use serde::{Deserialize, Serialize};

use crate::block::{LayoutModelError, PanelBlock};

/// Current schema version for layout documents.
pub const LAYOUT_DOCUMENT_SCHEMA_VERSION: u16 = 1;

const fn default_schema_version() -> u16 {
    LAYOUT_DOCUMENT_SCHEMA_VERSION
}

/// Serializable snapshot of a wall. Geometry is re-derived on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub wall_width: f64,
    pub wall_height: f64,
    pub joint_min: f64,
    pub joint_max: f64,
    #[serde(default)]
    pub blocks: Vec<PanelBlock>,
}

impl LayoutDocument {
    pub fn validate_schema(&self) -> Result<(), LayoutModelError> {
        if self.schema_version != LAYOUT_DOCUMENT_SCHEMA_VERSION {
            return Err(LayoutModelError::UnsupportedSchemaVersion {
                version: self.schema_version,
            });
        }
        Ok(())
    }
}
