#![forbid(unsafe_code)]

//! Panelwall Runtime
//!
//! Drives a [`WallLayout`](panelwall_layout::WallLayout) from user input.
//!
//! # Key Components
//!
//! - [`WallEditor`] - Owned editor state; mutated only through
//!   [`WallEditor::apply`] and [`WallEditor::handle_event`]
//! - [`DragPlacementMachine`] - Idle/Dragging lifecycle of a drag placement
//! - [`ListenerRegistry`] - Input listeners scoped to an active drag
//! - [`GridProjector`] - Host-supplied screen-to-grid mapping
//! - [`EditorConfig`] - Policy-as-data configuration (TOML/JSON)
//! - [`EditorScript`] - Deterministic replay of scripted sessions
//!
//! # Role in panelwall
//! `panelwall-runtime` sits between a host (renderer, CLI, tests) and the
//! layout model. Hosts feed it [`Event`](panelwall_core::Event)s and
//! [`EditorCommand`]s and render from the editor's geometry, faces and ghost.

pub mod config;
pub mod drag;
pub mod editor;
pub mod listener;
#[cfg(feature = "state-persistence")]
pub mod persistence;
pub mod projection;
pub mod script;

pub use config::{ConfigError, EditorConfig, GridSection, WallSection};
pub use drag::{
    DragCancelReason, DragEffect, DragInput, DragNoopReason, DragPlacementMachine, DragPolicy,
    DragState, DragTransition, OverlapPolicy, validate_candidate,
};
pub use editor::{EditorCommand, EditorEffect, EditorNoopReason, SEAM_PICK_RADIUS_PX, WallEditor};
pub use listener::{InputChannel, ListenerGuard, ListenerRegistry};
#[cfg(feature = "state-persistence")]
pub use persistence::{PersistenceError, load_document, load_editor, save_document};
pub use projection::{GridProjector, OrthoProjector, PlaneHit, WallPlaneProjector, WallPoint};
pub use script::{EditorScript, ReplayEntry, ReplayOutcome, ScriptError, ScriptKey, ScriptStep};
