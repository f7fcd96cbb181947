#![forbid(unsafe_code)]

//! Scripted editor sessions.
//!
//! An [`EditorScript`] is a JSON list of steps (explicit commands plus raw
//! pointer, key and focus input) replayed deterministically against a
//! [`WallEditor`]. Pointer input goes through the script's
//! [`OrthoProjector`], so positions are screen pixels.
//!
//! ```json
//! {
//!   "projector": { "origin": { "x": 0.0, "y": 0.0 }, "pixels_per_unit": 2.0 },
//!   "steps": [
//!     { "command": { "command": "clear_blocks" } },
//!     { "command": { "command": "start_drag", "span": { "w": 1, "h": 3 } } },
//!     { "move_to_cell": { "col": 2, "row": 0 } },
//!     "release"
//!   ]
//! }
//! ```

use std::path::Path;

use panelwall_core::{
    Event, KeyCode, KeyEvent, Modifiers, PointerEvent, PointerEventKind, PointerPosition,
};
use panelwall_layout::{LayoutDocument, LayoutModelError};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::editor::{EditorCommand, EditorEffect, WallEditor};
use crate::projection::OrthoProjector;

/// Keys a script can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKey {
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Char(char),
}

impl From<ScriptKey> for KeyCode {
    fn from(key: ScriptKey) -> Self {
        match key {
            ScriptKey::Escape => Self::Escape,
            ScriptKey::Enter => Self::Enter,
            ScriptKey::Tab => Self::Tab,
            ScriptKey::Backspace => Self::Backspace,
            ScriptKey::Delete => Self::Delete,
            ScriptKey::Char(c) => Self::Char(c),
        }
    }
}

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Command(EditorCommand),
    /// Pointer moved to a screen position.
    PointerMove { x: f64, y: f64 },
    /// Pointer moved onto the top-left of a cell's face.
    MoveToCell { col: u16, row: u16 },
    /// Primary button pressed at the last pointer position.
    Press {
        #[serde(default)]
        shift: bool,
    },
    /// Primary button released at the last pointer position.
    Release,
    PointerCancel,
    Key { key: ScriptKey },
    Focus { gained: bool },
}

/// A replayable editor session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorScript {
    pub projector: OrthoProjector,
    pub steps: Vec<ScriptStep>,
}

/// What one step produced. Steps whose input nobody listened to are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub step: usize,
    pub effect: EditorEffect,
}

/// Log and final state of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub entries: Vec<ReplayEntry>,
    pub document: LayoutDocument,
}

impl EditorScript {
    pub fn from_json_str(s: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(s).map_err(ScriptError::Json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ScriptError::Io)?;
        Self::from_json_str(&content)
    }

    /// Replay every step against `editor`, installing the script's projector.
    pub fn replay(&self, editor: &mut WallEditor) -> Vec<ReplayEntry> {
        editor.set_projector(self.projector);
        let mut pointer = PointerPosition::default();
        let mut entries = Vec::new();

        for (step, script_step) in self.steps.iter().enumerate() {
            let effect = match *script_step {
                ScriptStep::Command(command) => Some(editor.apply(command)),
                ScriptStep::PointerMove { x, y } => {
                    pointer = PointerPosition::new(x, y);
                    editor.handle_event(&Event::Pointer(PointerEvent::moved(x, y)))
                }
                ScriptStep::MoveToCell { col, row } => {
                    pointer = self.projector.cell_origin(col, row, editor.geometry());
                    editor.handle_event(&Event::Pointer(PointerEvent::moved(pointer.x, pointer.y)))
                }
                ScriptStep::Press { shift } => {
                    let mut press = PointerEvent::pressed(pointer.x, pointer.y);
                    if shift {
                        press = press.with_modifiers(Modifiers::SHIFT);
                    }
                    editor.handle_event(&Event::Pointer(press))
                }
                ScriptStep::Release => editor.handle_event(&Event::Pointer(
                    PointerEvent::released(pointer.x, pointer.y),
                )),
                ScriptStep::PointerCancel => editor.handle_event(&Event::Pointer(
                    PointerEvent::new(PointerEventKind::Cancel, pointer.x, pointer.y),
                )),
                ScriptStep::Key { key } => {
                    editor.handle_event(&Event::Key(KeyEvent::new(key.into())))
                }
                ScriptStep::Focus { gained } => editor.handle_event(&Event::Focus(gained)),
            };
            if let Some(effect) = effect {
                entries.push(ReplayEntry { step, effect });
            }
        }
        entries
    }

    /// Replay on a fresh editor built from `config`.
    pub fn run(&self, config: &EditorConfig) -> Result<ReplayOutcome, ScriptError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ScriptError::Config(errors));
        }
        let layout = config.to_layout_config().map_err(ScriptError::Model)?;
        let mut editor =
            WallEditor::new(layout, config.drag_policy()).map_err(ScriptError::Model)?;
        Ok(self.run_on(&mut editor))
    }

    /// Replay on an existing editor and snapshot the result.
    pub fn run_on(&self, editor: &mut WallEditor) -> ReplayOutcome {
        let entries = self.replay(editor);
        ReplayOutcome {
            entries,
            document: editor.to_document(),
        }
    }
}

/// Errors from loading or running a script.
#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The editor configuration failed validation.
    Config(Vec<String>),
    Model(LayoutModelError),
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "script parse error: {e}"),
            Self::Config(errors) => write!(f, "invalid config: {}", errors.join("; ")),
            Self::Model(e) => write!(f, "layout error: {e}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}
