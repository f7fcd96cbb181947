#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts (a 3-D viewport, a test script, a web canvas) translate their native
//! input into these types before handing them to the editor.
//!
//! # Design Notes
//!
//! - Pointer positions are screen pixels as `f64`; converting them to grid
//!   cells is the job of an injected projector, not of the event.
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - `Modifiers` use bitflags; a Shift-press extends the block selection.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// A keyboard event.
    Key(KeyEvent),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),
}

/// Pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Screen position of the pointer.
    pub position: PointerPosition,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: PointerPosition::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Moved, x, y)
    }

    #[must_use]
    pub const fn pressed(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    #[must_use]
    pub const fn released(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),

    /// Button released.
    Up(PointerButton),

    /// Pointer moved (with or without a button held).
    Moved,

    /// The host aborted the pointer stream (e.g. capture lost).
    Cancel,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a press (or repeat) of `Escape`.
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape) && !matches!(self.kind, KeyEventKind::Release)
    }
}

/// Key codes the editor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_release_is_not_escape() {
        assert!(KeyEvent::new(KeyCode::Escape).is_escape());
        assert!(
            KeyEvent::new(KeyCode::Escape)
                .with_kind(KeyEventKind::Repeat)
                .is_escape()
        );
        assert!(
            !KeyEvent::new(KeyCode::Escape)
                .with_kind(KeyEventKind::Release)
                .is_escape()
        );
        assert!(!KeyEvent::new(KeyCode::Enter).is_escape());
    }

    #[test]
    fn shift_is_read_from_combined_modifiers() {
        let mods = Modifiers::SHIFT | Modifiers::CTRL;
        assert!(PointerEvent::pressed(0.0, 0.0).with_modifiers(mods).shift());
        assert!(!PointerEvent::pressed(0.0, 0.0).with_modifiers(Modifiers::CTRL).shift());
        assert!(!PointerEvent::pressed(0.0, 0.0).shift());
    }

    #[test]
    fn pointer_helpers_set_kind() {
        assert_eq!(PointerEvent::moved(1.0, 2.0).kind, PointerEventKind::Moved);
        assert_eq!(
            PointerEvent::released(0.0, 0.0).kind,
            PointerEventKind::Up(PointerButton::Primary)
        );
        assert_eq!(
            PointerEvent::moved(3.0, 4.0).position,
            PointerPosition::new(3.0, 4.0)
        );
    }
}
