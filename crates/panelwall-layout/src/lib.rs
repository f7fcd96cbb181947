#![forbid(unsafe_code)]

//! Layout: reveal-gap solver and the panel block model.
//!
//! # Role in panelwall
//! `panelwall-layout` owns everything that is true about a wall independent of
//! input handling: the solved column/row geometry, the block store and its
//! invariants, seams, selection and the combine operation.
//!
//! # Primary responsibilities
//! - **Solver**: [`solve_axis`] and [`WallGeometry`].
//! - **Store**: [`LayoutStore`] keeps blocks in bounds, within [`SpanLimits`] and
//!   non-overlapping across every mutation.
//! - **Seams**: [`SeamRegistry`], [`SeamFocus`] and [`toggle_seam_joint`].
//! - **Group edits**: [`SelectionSet`] and [`combine_selected`].
//! - **Persistence shape**: [`LayoutDocument`].
//!
//! # How it fits in the system
//! The runtime (`panelwall-runtime`) drives a [`WallLayout`] from drag sessions
//! and editor commands; renderers read [`WallGeometry::face_rect`] and the
//! seam registry.

pub mod block;
pub mod combine;
pub mod document;
pub mod grid;
pub mod seam;
pub mod selection;
pub mod store;
pub mod wall;

pub use panelwall_core::{GridCell, GridRect, GridSpan};

pub use block::{BlockId, BlockIdAllocator, LayoutModelError, LockedJoints, PanelBlock, SpanLimits};
pub use combine::{CombineOutcome, CombinePlan, CombineRejection, combine_selected, plan_combine};
pub use document::{LAYOUT_DOCUMENT_SCHEMA_VERSION, LayoutDocument};
pub use grid::{
    AxisSolution, DEFAULT_CELL, DEFAULT_JOINT_MAX, DEFAULT_JOINT_MIN, DEFAULT_ROW_GAP, FaceRect,
    GapBounds, GridSpec, RowGapPolicy, WallGeometry, fixed_axis, solve_axis,
};
pub use seam::{
    Seam, SeamAxis, SeamFocus, SeamJointChange, SeamJointKind, SeamJointNoop, SeamRegistry,
    toggle_seam_joint,
};
pub use selection::SelectionSet;
pub use store::{LayoutStore, Placement};
pub use wall::{LayoutConfig, WallChange, WallDimensions, WallLayout, WallLimits};
