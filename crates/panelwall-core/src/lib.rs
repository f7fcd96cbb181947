#![forbid(unsafe_code)]

//! Core: grid primitives and normalized input events.
//!
//! # Role in panelwall
//! `panelwall-core` is the vocabulary shared by every other crate. It owns the
//! integer grid types that panel blocks are expressed in and the input event
//! types the editor consumes.
//!
//! # Primary responsibilities
//! - **Grid geometry**: [`GridCell`], [`GridSpan`], [`GridRect`] and the signed
//!   [`RawCell`] produced by pointer projection.
//! - **Event**: canonical pointer, key and focus events.
//!
//! # How it fits in the system
//! The layout crate (`panelwall-layout`) builds the block store on top of the
//! grid types; the runtime (`panelwall-runtime`) routes [`Event`] values into
//! the drag session and the editor.

pub mod event;
pub mod geometry;

pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerEvent,
    PointerEventKind, PointerPosition,
};
pub use geometry::{GridCell, GridRect, GridSpan, RawCell};
