#![forbid(unsafe_code)]

//! The wall editor: one owned state container driven by commands and events.
//!
//! # Design Notes
//!
//! - All mutation goes through [`WallEditor::apply`] (explicit commands) and
//!   [`WallEditor::handle_event`] (pointer/key/focus input). Neither returns
//!   an error: failures are reported as [`EditorEffect::Noop`] or
//!   [`EditorEffect::Rejected`].
//! - Drag input is only consumed on channels that currently have a listener
//!   attached; listeners exist only while a drag is active.
//! - While idle, pointer moves hover the nearest seam within
//!   [`SEAM_PICK_RADIUS_PX`] and a primary press toggles the block under the
//!   pointer (Shift keeps the rest of the selection). Both are translated into
//!   [`EditorCommand`]s.
//! - After every store mutation the selection is pruned to blocks that still
//!   exist; after every geometry change the seam focus is pruned to seams that
//!   still exist.

use std::fmt;

use panelwall_core::{
    Event, GridRect, GridSpan, PointerButton, PointerEvent, PointerEventKind, PointerPosition,
};
use panelwall_layout::{
    BlockId, FaceRect, LayoutConfig, LayoutDocument, LayoutModelError,
    LayoutStore, LockedJoints, Seam, SeamFocus, SeamJointKind, SeamJointNoop, SeamRegistry,
    SelectionSet, WallChange, WallGeometry, WallLayout, combine_selected, toggle_seam_joint,
};
use serde::{Deserialize, Serialize};

use crate::drag::{
    DragCancelReason, DragEffect, DragInput, DragPlacementMachine, DragPolicy, DragState,
    DragTransition,
};
use crate::listener::{InputChannel, ListenerGuard, ListenerRegistry};
use crate::projection::{GridProjector, OrthoProjector, PlaneHit};

const TRACE_TARGET: &str = "panelwall.editor";

/// Screen distance within which an idle pointer hovers a seam.
pub const SEAM_PICK_RADIUS_PX: f64 = 22.0;

/// Explicit editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Resize the wall; omitted axes keep their value. Regenerates the layout.
    SetWall {
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },
    SetJointBounds {
        min: f64,
        max: f64,
    },
    /// Remove every block.
    ClearBlocks,
    StartDrag {
        span: GridSpan,
    },
    CancelDrag,
    ToggleSelect {
        id: BlockId,
        #[serde(default)]
        multi: bool,
    },
    ClearSelection,
    CombineSelected,
    HoverSeam {
        seam: Option<Seam>,
    },
    /// Select or deselect a seam in the overlay.
    ToggleSeam {
        seam: Seam,
    },
    /// Split blocks across a seam, or join the pairs meeting at it.
    ToggleSeamJoint {
        seam: Seam,
    },
}

impl EditorCommand {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetWall { .. } => "set_wall",
            Self::SetJointBounds { .. } => "set_joint_bounds",
            Self::ClearBlocks => "clear_blocks",
            Self::StartDrag { .. } => "start_drag",
            Self::CancelDrag => "cancel_drag",
            Self::ToggleSelect { .. } => "toggle_select",
            Self::ClearSelection => "clear_selection",
            Self::CombineSelected => "combine_selected",
            Self::HoverSeam { .. } => "hover_seam",
            Self::ToggleSeam { .. } => "toggle_seam",
            Self::ToggleSeamJoint { .. } => "toggle_seam_joint",
        }
    }
}

/// Why a command or event changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorNoopReason {
    UnknownBlock,
    SelectionAlreadyEmpty,
    HoverUnchanged,
    SeamOutsideGrid,
    BoundarySeam,
    NothingToJoin,
}

/// What a command or event did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EditorEffect {
    WallChanged {
        change: WallChange,
    },
    BlocksCleared {
        removed: usize,
    },
    /// A drag transition that did not place a block.
    Drag {
        transition: DragTransition,
    },
    /// A drag commit placed a block.
    Placed {
        transition: DragTransition,
        id: BlockId,
        rect: GridRect,
        displaced: Vec<BlockId>,
    },
    SelectionChanged {
        selected: Vec<BlockId>,
    },
    Combined {
        id: BlockId,
        rect: GridRect,
        folded: Vec<BlockId>,
    },
    SeamFocusChanged {
        hovered: Option<Seam>,
        selected: Option<Seam>,
    },
    SeamJointToggled {
        seam: Seam,
        kind: SeamJointKind,
        removed: Vec<BlockId>,
        created: Vec<BlockId>,
    },
    Noop {
        reason: EditorNoopReason,
    },
    Rejected {
        reason: String,
    },
}

impl EditorEffect {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WallChanged { .. } => "wall_changed",
            Self::BlocksCleared { .. } => "blocks_cleared",
            Self::Drag { .. } => "drag",
            Self::Placed { .. } => "placed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::Combined { .. } => "combined",
            Self::SeamFocusChanged { .. } => "seam_focus_changed",
            Self::SeamJointToggled { .. } => "seam_joint_toggled",
            Self::Noop { .. } => "noop",
            Self::Rejected { .. } => "rejected",
        }
    }

    /// Whether the effect changed the block store.
    #[must_use]
    pub const fn mutated_store(&self) -> bool {
        match self {
            Self::WallChanged { change } => change.regenerated,
            Self::BlocksCleared { .. }
            | Self::Placed { .. }
            | Self::Combined { .. }
            | Self::SeamJointToggled { .. } => true,
            _ => false,
        }
    }

    fn rejected(err: impl fmt::Display) -> Self {
        Self::Rejected {
            reason: err.to_string(),
        }
    }
}

/// Owned editor state.
pub struct WallEditor {
    wall: WallLayout,
    selection: SelectionSet,
    seams: SeamFocus,
    drag: DragPlacementMachine,
    listeners: ListenerRegistry,
    drag_listeners: Option<ListenerGuard>,
    projector: Box<dyn GridProjector>,
    seam_pick_radius: f64,
    commands_applied: u64,
}

impl fmt::Debug for WallEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WallEditor")
            .field("wall", &self.wall)
            .field("selection", &self.selection)
            .field("seams", &self.seams)
            .field("drag", &self.drag)
            .field("listeners", &self.listeners.channels())
            .field("commands_applied", &self.commands_applied)
            .finish_non_exhaustive()
    }
}

impl WallEditor {
    /// A fresh, auto-filled wall.
    pub fn new(layout: LayoutConfig, drag: DragPolicy) -> Result<Self, LayoutModelError> {
        Ok(Self::from_wall(WallLayout::new(layout)?, drag))
    }

    /// Restore an editor from a persisted document.
    pub fn from_document(
        document: &LayoutDocument,
        layout: LayoutConfig,
        drag: DragPolicy,
    ) -> Result<Self, LayoutModelError> {
        Ok(Self::from_wall(WallLayout::from_document(document, layout)?, drag))
    }

    fn from_wall(wall: WallLayout, drag: DragPolicy) -> Self {
        Self {
            wall,
            selection: SelectionSet::default(),
            seams: SeamFocus::default(),
            drag: DragPlacementMachine::new(drag),
            listeners: ListenerRegistry::new(),
            drag_listeners: None,
            projector: Box::new(OrthoProjector::default()),
            seam_pick_radius: SEAM_PICK_RADIUS_PX,
            commands_applied: 0,
        }
    }

    /// Use `projector` for pointer events.
    #[must_use]
    pub fn with_projector(mut self, projector: impl GridProjector + 'static) -> Self {
        self.set_projector(projector);
        self
    }

    pub fn set_projector(&mut self, projector: impl GridProjector + 'static) {
        self.projector = Box::new(projector);
    }

    /// Screen radius for idle seam hover; `0` only hovers exact hits.
    #[must_use]
    pub fn with_seam_pick_radius(mut self, radius_px: f64) -> Self {
        self.seam_pick_radius = radius_px;
        self
    }

    #[must_use]
    pub const fn wall(&self) -> &WallLayout {
        &self.wall
    }

    #[must_use]
    pub const fn store(&self) -> &LayoutStore {
        self.wall.store()
    }

    #[must_use]
    pub const fn geometry(&self) -> &WallGeometry {
        self.wall.geometry()
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[must_use]
    pub const fn seam_focus(&self) -> &SeamFocus {
        &self.seams
    }

    /// Seams pinned by drag-placed blocks.
    #[must_use]
    pub fn seam_registry(&self) -> SeamRegistry {
        SeamRegistry::from_blocks(self.store().blocks())
    }

    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    #[must_use]
    pub const fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Channels the editor currently consumes input on.
    #[must_use]
    pub fn listening_channels(&self) -> Vec<InputChannel> {
        self.listeners.channels()
    }

    /// Face rectangle of every block, in store order.
    pub fn faces(&self) -> impl Iterator<Item = (BlockId, FaceRect)> + '_ {
        let geometry = self.wall.geometry();
        self.store()
            .blocks()
            .iter()
            .map(move |block| (block.id, geometry.face_rect(&block.rect())))
    }

    /// Face rectangle of the drag ghost, when over a valid candidate.
    #[must_use]
    pub fn ghost(&self) -> Option<FaceRect> {
        self.drag
            .candidate_rect()
            .map(|rect| self.wall.geometry().face_rect(&rect))
    }

    #[must_use]
    pub fn to_document(&self) -> LayoutDocument {
        self.wall.to_document()
    }

    /// Apply one command.
    pub fn apply(&mut self, command: EditorCommand) -> EditorEffect {
        self.commands_applied = self.commands_applied.saturating_add(1);
        let name = command.name();
        let _span = tracing::debug_span!(
            target: TRACE_TARGET,
            "editor.apply",
            command = name,
            sequence = self.commands_applied,
        )
        .entered();

        let effect = match command {
            EditorCommand::SetWall { width, height } => {
                self.end_drag();
                let change = self.wall.set_dimensions(width, height);
                self.after_wall_change(change)
            }
            EditorCommand::SetJointBounds { min, max } => {
                self.end_drag();
                let change = self.wall.set_joint_bounds(min, max);
                self.after_wall_change(change)
            }
            EditorCommand::ClearBlocks => {
                let removed = self.wall.store_mut().clear();
                self.selection.clear();
                EditorEffect::BlocksCleared {
                    removed: removed.len(),
                }
            }
            EditorCommand::StartDrag { span } => self.drive_drag(DragInput::Start { span }),
            EditorCommand::CancelDrag => self.drive_drag(DragInput::Cancel {
                reason: DragCancelReason::Programmatic,
            }),
            EditorCommand::ToggleSelect { id, multi } => {
                if self.selection.toggle(id, multi, self.wall.store()) {
                    self.selection_changed()
                } else {
                    EditorEffect::Noop {
                        reason: EditorNoopReason::UnknownBlock,
                    }
                }
            }
            EditorCommand::ClearSelection => {
                if self.selection.is_empty() {
                    EditorEffect::Noop {
                        reason: EditorNoopReason::SelectionAlreadyEmpty,
                    }
                } else {
                    self.selection.clear();
                    self.selection_changed()
                }
            }
            EditorCommand::CombineSelected => {
                match combine_selected(&mut self.selection, self.wall.store_mut()) {
                    Ok(outcome) => EditorEffect::Combined {
                        id: outcome.id,
                        rect: outcome.rect,
                        folded: outcome.folded,
                    },
                    Err(rejection) => {
                        tracing::debug!(
                            target: TRACE_TARGET,
                            reason = %rejection,
                            "combine rejected"
                        );
                        EditorEffect::rejected(rejection)
                    }
                }
            }
            EditorCommand::HoverSeam { seam } => {
                if self.seams.hover(seam, self.wall.geometry()) {
                    self.seam_focus_changed()
                } else {
                    EditorEffect::Noop {
                        reason: EditorNoopReason::HoverUnchanged,
                    }
                }
            }
            EditorCommand::ToggleSeam { seam } => {
                if self.seams.toggle(seam, self.wall.geometry()) {
                    self.seam_focus_changed()
                } else {
                    EditorEffect::Noop {
                        reason: EditorNoopReason::SeamOutsideGrid,
                    }
                }
            }
            EditorCommand::ToggleSeamJoint { seam } => {
                match toggle_seam_joint(self.wall.store_mut(), seam) {
                    Ok(change) => {
                        self.selection.retain_present(self.wall.store());
                        EditorEffect::SeamJointToggled {
                            seam: change.seam,
                            kind: change.kind,
                            removed: change.removed,
                            created: change.created,
                        }
                    }
                    Err(SeamJointNoop::BoundarySeam) => EditorEffect::Noop {
                        reason: EditorNoopReason::BoundarySeam,
                    },
                    Err(SeamJointNoop::OutOfRange) => EditorEffect::Noop {
                        reason: EditorNoopReason::SeamOutsideGrid,
                    },
                    Err(SeamJointNoop::NothingToJoin) => EditorEffect::Noop {
                        reason: EditorNoopReason::NothingToJoin,
                    },
                    Err(SeamJointNoop::Rejected(err)) => EditorEffect::rejected(err),
                }
            }
        };

        tracing::debug!(
            target: TRACE_TARGET,
            command = name,
            effect = effect.name(),
            revision = self.store().revision(),
            "command applied"
        );
        effect
    }

    /// Route one input event.
    ///
    /// During a drag, events on listening channels drive it. While idle,
    /// pointer moves and primary presses pick seams and blocks. Returns
    /// `None` when the event changes nothing.
    pub fn handle_event(&mut self, event: &Event) -> Option<EditorEffect> {
        if let Some(channel) = InputChannel::of(event)
            && self.listeners.is_listening(channel)
        {
            return self.drag_event(event);
        }
        if !matches!(self.drag.state(), DragState::Idle) {
            return None;
        }
        match event {
            Event::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Moved => self.pick_seam(pointer.position),
                PointerEventKind::Down(PointerButton::Primary) => self.pick_block(pointer),
                _ => None,
            },
            Event::Key(_) | Event::Focus(_) => None,
        }
    }

    fn drag_event(&mut self, event: &Event) -> Option<EditorEffect> {
        let input = match event {
            Event::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Moved => DragInput::Move {
                    cell: self.projector.project(pointer.position, self.wall.geometry()),
                },
                PointerEventKind::Up(_) => DragInput::Release,
                PointerEventKind::Cancel => DragInput::Cancel {
                    reason: DragCancelReason::PointerCancel,
                },
                PointerEventKind::Down(_) => return None,
            },
            Event::Key(key) if key.is_escape() => DragInput::Cancel {
                reason: DragCancelReason::EscapeKey,
            },
            Event::Key(_) | Event::Focus(true) => return None,
            Event::Focus(false) => DragInput::Cancel {
                reason: DragCancelReason::FocusLost,
            },
        };
        Some(self.drive_drag(input))
    }

    fn pick_seam(&mut self, position: PointerPosition) -> Option<EditorEffect> {
        let geometry = self.wall.geometry();
        let seam = match self.projector.locate(position, geometry) {
            PlaneHit::Unsupported => return None,
            PlaneHit::Miss => None,
            PlaneHit::At {
                left,
                top,
                pixels_per_unit,
            } if pixels_per_unit.is_finite() && pixels_per_unit > 0.0 => {
                geometry.seam_near(left, top, self.seam_pick_radius / pixels_per_unit)
            }
            PlaneHit::At { .. } => None,
        };
        if seam == self.seams.hovered() {
            return None;
        }
        Some(self.apply(EditorCommand::HoverSeam { seam }))
    }

    fn pick_block(&mut self, pointer: &PointerEvent) -> Option<EditorEffect> {
        let cell = self
            .projector
            .project(pointer.position, self.wall.geometry())?
            .to_cell()?;
        let id = self.store().block_at(cell)?.id;
        Some(self.apply(EditorCommand::ToggleSelect {
            id,
            multi: pointer.shift(),
        }))
    }

    fn drive_drag(&mut self, input: DragInput) -> EditorEffect {
        let transition = self.drag.apply(input, Some(self.wall.store()));
        if transition.ended() {
            self.drag_listeners = None;
        }
        match transition.effect {
            DragEffect::Started { .. } => {
                self.drag_listeners = Some(self.listeners.acquire(&self.drag_channels()));
                EditorEffect::Drag { transition }
            }
            DragEffect::Committed { origin, span } => {
                let rect = GridRect::from_parts(origin, span);
                match self.wall.place(rect, LockedJoints::bounding(&rect)) {
                    Ok(placement) => {
                        self.selection.retain_present(self.wall.store());
                        EditorEffect::Placed {
                            transition,
                            id: placement.id,
                            rect,
                            displaced: placement.displaced.iter().map(|block| block.id).collect(),
                        }
                    }
                    Err(err) => EditorEffect::rejected(err),
                }
            }
            _ => EditorEffect::Drag { transition },
        }
    }

    fn drag_channels(&self) -> Vec<InputChannel> {
        let mut channels = vec![
            InputChannel::PointerMove,
            InputChannel::PointerUp,
            InputChannel::Key,
        ];
        if self.drag.policy().cancel_on_focus_loss {
            channels.push(InputChannel::Focus);
        }
        channels
    }

    fn end_drag(&mut self) {
        if self.drag.force_cancel().is_some() {
            self.drag_listeners = None;
        }
    }

    fn after_wall_change(&mut self, change: Result<WallChange, LayoutModelError>) -> EditorEffect {
        match change {
            Ok(change) => {
                self.selection.retain_present(self.wall.store());
                self.seams.retain_within(self.wall.geometry());
                EditorEffect::WallChanged { change }
            }
            Err(err) => EditorEffect::rejected(err),
        }
    }

    fn selection_changed(&self) -> EditorEffect {
        EditorEffect::SelectionChanged {
            selected: self.selection.as_sorted_vec(),
        }
    }

    fn seam_focus_changed(&self) -> EditorEffect {
        EditorEffect::SeamFocusChanged {
            hovered: self.seams.hovered(),
            selected: self.seams.selected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelwall_core::{GridCell, KeyCode, KeyEvent, Modifiers, RawCell};

    fn editor() -> WallEditor {
        WallEditor::new(LayoutConfig::default(), DragPolicy::default()).expect("default editor")
    }

    fn clear(editor: &mut WallEditor) {
        assert!(matches!(
            editor.apply(EditorCommand::ClearBlocks),
            EditorEffect::BlocksCleared { .. }
        ));
    }

    fn fixed_projector(col: i32, row: i32) -> impl GridProjector {
        move |_: PointerPosition, _: &WallGeometry| Some(RawCell::new(col, row))
    }

    #[test]
    fn drag_lifecycle_attaches_and_detaches_listeners() {
        let mut editor = editor();
        assert!(editor.listening_channels().is_empty());
        editor.apply(EditorCommand::StartDrag {
            span: GridSpan::new(1, 3),
        });
        assert_eq!(
            editor.listening_channels(),
            vec![
                InputChannel::PointerMove,
                InputChannel::PointerUp,
                InputChannel::Key,
                InputChannel::Focus,
            ]
        );
        let effect = editor.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape)));
        assert!(matches!(effect, Some(EditorEffect::Drag { .. })));
        assert!(editor.listening_channels().is_empty());
        assert_eq!(editor.drag_state(), DragState::Idle);
    }

    #[test]
    fn idle_keys_focus_and_releases_are_ignored() {
        let mut editor = editor();
        assert_eq!(editor.handle_event(&Event::Focus(false)), None);
        assert_eq!(editor.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape))), None);
        assert_eq!(
            editor.handle_event(&Event::Pointer(PointerEvent::released(30.0, 30.0))),
            None
        );
        assert_eq!(editor.listeners().total(), 0);
    }

    #[test]
    fn idle_pointer_hovers_nearest_seam() {
        let mut editor = editor();
        let revision = editor.store().revision();
        // Crossing of vertical seam 2 and horizontal seam 2.
        let effect = editor.handle_event(&Event::Pointer(PointerEvent::moved(41.625, 36.625)));
        assert_eq!(
            effect,
            Some(EditorEffect::SeamFocusChanged {
                hovered: Some(Seam::vertical(2)),
                selected: None,
            })
        );
        // Same seam again changes nothing.
        assert_eq!(
            editor.handle_event(&Event::Pointer(PointerEvent::moved(42.0, 40.0))),
            None
        );
        let effect = editor.handle_event(&Event::Pointer(PointerEvent::moved(-100.0, -100.0)));
        assert!(matches!(
            effect,
            Some(EditorEffect::SeamFocusChanged { hovered: None, .. })
        ));
        assert_eq!(editor.store().revision(), revision);
    }

    #[test]
    fn pick_radius_scales_with_screen_pixels() {
        // 3 wall units from vertical seam 1 is 6 px at 2 px per unit.
        let projector = OrthoProjector::new(PointerPosition::default(), 2.0);
        let mut editor = editor().with_projector(projector).with_seam_pick_radius(5.0);
        let at = PointerEvent::moved(24.375 * 2.0, 45.75 * 2.0);
        assert_eq!(editor.handle_event(&Event::Pointer(at)), None);

        let mut editor = self::editor().with_projector(projector).with_seam_pick_radius(6.0);
        assert!(matches!(
            editor.handle_event(&Event::Pointer(at)),
            Some(EditorEffect::SeamFocusChanged { hovered: Some(seam), .. })
                if seam == Seam::vertical(1)
        ));
    }

    #[test]
    fn closure_projectors_never_hover() {
        let mut editor = editor().with_projector(fixed_projector(1, 1));
        assert_eq!(
            editor.handle_event(&Event::Pointer(PointerEvent::moved(41.625, 36.625))),
            None
        );
        assert_eq!(editor.seam_focus().hovered(), None);
    }

    #[test]
    fn press_selects_and_shift_press_extends() {
        let mut editor = editor();
        let projector = OrthoProjector::default();
        let first = editor.store().block_at(GridCell::new(0, 0)).expect("filled").id;
        let second = editor.store().block_at(GridCell::new(1, 0)).expect("filled").id;

        let at = projector.cell_origin(0, 0, editor.geometry());
        let effect = editor.handle_event(&Event::Pointer(PointerEvent::pressed(at.x, at.y)));
        assert_eq!(
            effect,
            Some(EditorEffect::SelectionChanged {
                selected: vec![first],
            })
        );

        let at = projector.cell_origin(1, 0, editor.geometry());
        let shift = PointerEvent::pressed(at.x, at.y).with_modifiers(Modifiers::SHIFT);
        editor.handle_event(&Event::Pointer(shift));
        assert_eq!(editor.selection().as_sorted_vec(), vec![first, second]);

        // A plain press replaces the selection.
        editor.handle_event(&Event::Pointer(PointerEvent::pressed(at.x, at.y)));
        assert_eq!(editor.selection().as_sorted_vec(), vec![second]);

        // Off the wall nothing is picked.
        assert_eq!(
            editor.handle_event(&Event::Pointer(PointerEvent::pressed(-50.0, -50.0))),
            None
        );
        assert_eq!(editor.selection().as_sorted_vec(), vec![second]);
    }

    #[test]
    fn picking_is_suspended_while_dragging() {
        let mut editor = editor();
        editor.apply(EditorCommand::StartDrag {
            span: GridSpan::new(1, 2),
        });
        assert_eq!(
            editor.handle_event(&Event::Pointer(PointerEvent::pressed(2.25, 0.25))),
            None
        );
        editor.handle_event(&Event::Pointer(PointerEvent::moved(41.625, 36.625)));
        assert_eq!(editor.seam_focus().hovered(), None);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn commit_places_locked_block() {
        let mut editor = editor().with_projector(fixed_projector(2, 0));
        clear(&mut editor);
        editor.apply(EditorCommand::StartDrag {
            span: GridSpan::new(1, 3),
        });
        editor.handle_event(&Event::Pointer(PointerEvent::moved(0.0, 0.0)));
        assert!(editor.ghost().is_some());
        let effect = editor
            .handle_event(&Event::Pointer(PointerEvent::released(0.0, 0.0)))
            .expect("release is consumed");
        let EditorEffect::Placed { rect, displaced, .. } = effect else {
            panic!("expected placement, got {effect:?}");
        };
        assert_eq!(rect, GridRect::new(2, 0, 1, 3));
        assert!(displaced.is_empty());
        assert_eq!(editor.store().len(), 1);
        let registry = editor.seam_registry();
        assert!(registry.is_locked(Seam::vertical(2)));
        assert!(registry.is_locked(Seam::horizontal(3)));
        assert!(editor.listening_channels().is_empty());
    }

    #[test]
    fn focus_loss_cancels_only_when_enabled() {
        let policy = DragPolicy {
            cancel_on_focus_loss: false,
            ..DragPolicy::default()
        };
        let mut editor = WallEditor::new(LayoutConfig::default(), policy).expect("editor");
        editor.apply(EditorCommand::StartDrag {
            span: GridSpan::new(1, 2),
        });
        assert_eq!(editor.handle_event(&Event::Focus(false)), None);
        assert!(matches!(editor.drag_state(), DragState::Dragging { .. }));

        let mut editor = self::editor();
        editor.apply(EditorCommand::StartDrag {
            span: GridSpan::new(1, 2),
        });
        let effect = editor.handle_event(&Event::Focus(false));
        assert!(matches!(effect, Some(EditorEffect::Drag { transition }) if transition.ended()));
    }

    #[test]
    fn resize_cancels_active_drag() {
        let mut editor = editor();
        editor.apply(EditorCommand::StartDrag {
            span: GridSpan::new(1, 2),
        });
        let effect = editor.apply(EditorCommand::SetWall {
            width: Some(200.0),
            height: None,
        });
        assert!(matches!(effect, EditorEffect::WallChanged { change } if change.regenerated));
        assert_eq!(editor.drag_state(), DragState::Idle);
        assert_eq!(editor.listeners().total(), 0);
    }

    #[test]
    fn selection_is_pruned_after_regeneration() {
        let mut editor = editor();
        let id = editor.store().blocks()[0].id;
        editor.apply(EditorCommand::ToggleSelect { id, multi: false });
        assert_eq!(editor.selection().len(), 1);
        editor.apply(EditorCommand::SetWall {
            width: Some(144.0),
            height: Some(108.0),
        });
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn seam_focus_survives_only_valid_seams() {
        let mut editor = editor();
        editor.apply(EditorCommand::ToggleSeam {
            seam: Seam::vertical(7),
        });
        assert_eq!(editor.seam_focus().selected(), Some(Seam::vertical(7)));
        editor.apply(EditorCommand::SetWall {
            width: Some(72.0),
            height: None,
        });
        assert_eq!(editor.seam_focus().selected(), None);
        assert_eq!(
            editor.apply(EditorCommand::ToggleSeam {
                seam: Seam::vertical(40)
            }),
            EditorEffect::Noop {
                reason: EditorNoopReason::SeamOutsideGrid
            }
        );
    }

    #[test]
    fn rejected_combine_reports_reason() {
        let mut editor = editor();
        let ids: Vec<_> = editor.store().blocks().iter().take(2).map(|b| b.id).collect();
        for id in &ids {
            editor.apply(EditorCommand::ToggleSelect { id: *id, multi: true });
        }
        let revision = editor.store().revision();
        let effect = editor.apply(EditorCommand::CombineSelected);
        assert!(matches!(effect, EditorEffect::Rejected { .. }));
        assert_eq!(editor.store().revision(), revision);
        assert_eq!(editor.selection().len(), 2);
    }

    #[test]
    fn effects_serialize_with_tag() {
        let effect = EditorEffect::Noop {
            reason: EditorNoopReason::NothingToJoin,
        };
        let json = serde_json::to_value(&effect).expect("serialize");
        assert_eq!(json["effect"], "noop");
        assert_eq!(json["reason"], "nothing_to_join");
    }

    #[test]
    fn commands_parse_from_json() {
        let command: EditorCommand =
            serde_json::from_str(r#"{"command":"start_drag","span":{"w":1,"h":3}}"#)
                .expect("parse");
        assert_eq!(
            command,
            EditorCommand::StartDrag {
                span: GridSpan::new(1, 3)
            }
        );
        let command: EditorCommand =
            serde_json::from_str(r#"{"command":"set_wall","width":200}"#).expect("parse");
        assert_eq!(
            command,
            EditorCommand::SetWall {
                width: Some(200.0),
                height: None
            }
        );
    }
}
