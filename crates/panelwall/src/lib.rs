#![forbid(unsafe_code)]

//! Panelwall public facade crate.
//!
//! Re-exports the types a host needs to lay out a panel wall and drive it
//! from pointer input, plus a prelude for day-to-day usage.

mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use panelwall_core::{
    Event, GridCell, GridRect, GridSpan, KeyCode, KeyEvent, Modifiers, PointerButton,
    PointerEvent, PointerEventKind, PointerPosition, RawCell,
};

// --- Layout re-exports -----------------------------------------------------

pub use panelwall_layout::{
    BlockId, FaceRect, GapBounds, GridSpec, LayoutConfig, LayoutDocument, LayoutModelError,
    LayoutStore, LockedJoints, PanelBlock, RowGapPolicy, Seam, SeamAxis, SeamFocus, SeamRegistry,
    SelectionSet, SpanLimits, WallDimensions, WallGeometry, WallLayout, WallLimits, solve_axis,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use panelwall_runtime::{
    DragPolicy, EditorCommand, EditorConfig, EditorEffect, EditorScript, GridProjector,
    OrthoProjector, OverlapPolicy, PlaneHit, WallEditor, WallPlaneProjector, WallPoint,
};

/// Build an editor from a configuration file (`.toml` or `.json`).
#[cfg(feature = "runtime")]
pub fn editor_from_config(path: impl AsRef<std::path::Path>) -> Result<WallEditor> {
    let config = EditorConfig::load(path)?;
    let layout = config.to_layout_config()?;
    Ok(WallEditor::new(layout, config.drag_policy())?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BlockId, Error, Event, GridRect, GridSpan, LayoutConfig, LayoutDocument, PointerEvent,
        Result, Seam, WallGeometry, WallLayout,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{DragPolicy, EditorCommand, EditorConfig, EditorEffect, WallEditor};

    pub use crate::{core, layout};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use panelwall_core as core;
pub use panelwall_layout as layout;
#[cfg(feature = "runtime")]
pub use panelwall_runtime as runtime;

#[cfg(all(test, feature = "runtime"))]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_drives_an_editor() {
        let mut editor =
            WallEditor::new(LayoutConfig::default(), DragPolicy::default()).expect("editor");
        let effect = editor.apply(EditorCommand::ClearBlocks);
        assert!(matches!(effect, EditorEffect::BlocksCleared { removed: 21 }));
    }

    #[test]
    fn editor_from_config_reports_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"grid":{"cell":0}}"#).expect("write");
        let err = crate::editor_from_config(&path).expect_err("invalid");
        assert!(matches!(err, Error::Config(_)));

        std::fs::write(&path, r#"{"wall":{"default_width":200}}"#).expect("write");
        let editor = crate::editor_from_config(&path).expect("valid");
        assert_eq!(editor.wall().dimensions().width, 200.0);
    }
}
