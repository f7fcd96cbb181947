#![forbid(unsafe_code)]

//! Drag placement lifecycle.
//!
//! ```text
//! Idle --start--> Dragging --release (candidate, span > 1x1)--> Idle [Committed]
//!                    |  ^
//!                    |  '--move (candidate re-validated)
//!                    '--cancel / release without candidate--> Idle [Canceled]
//! ```
//!
//! The machine never touches the store. It reads the store to validate the
//! candidate and reports a `Committed` effect; the editor performs the
//! placement.

use panelwall_core::{GridCell, GridRect, GridSpan, RawCell};
use panelwall_layout::LayoutStore;
use serde::{Deserialize, Serialize};

const TRACE_TARGET: &str = "panelwall.drag";

/// How a candidate interacts with blocks already on the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Any in-bounds cell is a candidate; placement displaces what it covers.
    #[default]
    Replace,
    /// Cells whose footprint covers a block with locked joints are refused.
    AvoidLocked,
    /// Cells whose footprint covers any block are refused.
    Reject,
}

/// Drag behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragPolicy {
    pub overlap_policy: OverlapPolicy,
    /// Cancel the drag when the host loses focus.
    pub cancel_on_focus_loss: bool,
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::Replace,
            cancel_on_focus_loss: true,
        }
    }
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Dragging {
        span: GridSpan,
        candidate: Option<GridCell>,
        moves: u64,
    },
}

/// Canonical cancel reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    EscapeKey,
    PointerCancel,
    FocusLost,
    /// Released while no valid candidate was under the pointer.
    NoCandidate,
    /// Released with a `1x1` span, which never commits.
    UnitSpan,
    Programmatic,
}

/// Why an input left the machine unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    SpanOutOfLimits,
}

/// Semantic drag input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum DragInput {
    Start { span: GridSpan },
    /// Pointer moved; `cell` is the projected cell, `None` when the pointer
    /// misses the wall plane.
    Move { cell: Option<RawCell> },
    Release,
    Cancel { reason: DragCancelReason },
}

/// Effect of one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        span: GridSpan,
    },
    CandidateUpdated {
        previous: Option<GridCell>,
        candidate: Option<GridCell>,
    },
    Committed {
        origin: GridCell,
        span: GridSpan,
    },
    Canceled {
        span: Option<GridSpan>,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One state-machine transition with deterministic telemetry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

impl DragTransition {
    /// Whether the transition left the machine idle after being active.
    #[must_use]
    pub const fn ended(&self) -> bool {
        matches!(self.from, DragState::Dragging { .. }) && matches!(self.to, DragState::Idle)
    }
}

/// Validate a projected cell as a drop candidate for `span`.
///
/// The footprint must lie inside the grid and satisfy the overlap policy.
#[must_use]
pub fn validate_candidate(
    cell: Option<RawCell>,
    span: GridSpan,
    store: &LayoutStore,
    policy: OverlapPolicy,
) -> Option<GridCell> {
    let origin = cell?.to_cell()?;
    let rect = GridRect::from_parts(origin, span);
    store.check_candidate(&rect).ok()?;
    let admitted = match policy {
        OverlapPolicy::Replace => true,
        OverlapPolicy::AvoidLocked => store.overlaps(&rect).iter().all(|block| !block.is_locked()),
        OverlapPolicy::Reject => store.overlaps(&rect).is_empty(),
    };
    admitted.then_some(origin)
}

/// Drag placement lifecycle machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPlacementMachine {
    state: DragState,
    policy: DragPolicy,
    transition_counter: u64,
}

impl Default for DragPlacementMachine {
    fn default() -> Self {
        Self::new(DragPolicy::default())
    }
}

impl DragPlacementMachine {
    #[must_use]
    pub const fn new(policy: DragPolicy) -> Self {
        Self {
            state: DragState::Idle,
            policy,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub const fn policy(&self) -> DragPolicy {
        self.policy
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Current candidate cell, if dragging over a valid drop target.
    #[must_use]
    pub const fn candidate(&self) -> Option<GridCell> {
        match self.state {
            DragState::Dragging { candidate, .. } => candidate,
            DragState::Idle => None,
        }
    }

    /// Current candidate footprint, for ghost rendering.
    #[must_use]
    pub fn candidate_rect(&self) -> Option<GridRect> {
        match self.state {
            DragState::Dragging {
                span,
                candidate: Some(origin),
                ..
            } => Some(GridRect::from_parts(origin, span)),
            _ => None,
        }
    }

    /// Unconditionally return to `Idle`.
    ///
    /// Returns `None` when already idle.
    pub fn force_cancel(&mut self) -> Option<DragTransition> {
        self.is_active().then(|| {
            self.apply(
                DragInput::Cancel {
                    reason: DragCancelReason::Programmatic,
                },
                None,
            )
        })
    }

    /// Apply one input. `store` is needed to validate `Start` spans and
    /// `Move` candidates; without it starts are refused and moves clear the
    /// candidate.
    pub fn apply(&mut self, input: DragInput, store: Option<&LayoutStore>) -> DragTransition {
        let from = self.state;
        let effect = match (self.state, input) {
            (DragState::Idle, DragInput::Start { span }) => {
                if store.is_some_and(|store| store.limits().admits(span)) {
                    self.state = DragState::Dragging {
                        span,
                        candidate: None,
                        moves: 0,
                    };
                    DragEffect::Started { span }
                } else {
                    DragEffect::Noop {
                        reason: DragNoopReason::SpanOutOfLimits,
                    }
                }
            }
            (DragState::Idle, _) => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            (DragState::Dragging { .. }, DragInput::Start { .. }) => DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            },
            (
                DragState::Dragging {
                    span,
                    candidate: previous,
                    moves,
                },
                DragInput::Move { cell },
            ) => {
                let candidate = store.and_then(|store| {
                    validate_candidate(cell, span, store, self.policy.overlap_policy)
                });
                self.state = DragState::Dragging {
                    span,
                    candidate,
                    moves: moves.saturating_add(1),
                };
                DragEffect::CandidateUpdated {
                    previous,
                    candidate,
                }
            }
            (DragState::Dragging { span, candidate, .. }, DragInput::Release) => {
                self.state = DragState::Idle;
                match candidate {
                    _ if span.is_unit() => DragEffect::Canceled {
                        span: Some(span),
                        reason: DragCancelReason::UnitSpan,
                    },
                    Some(origin) => DragEffect::Committed { origin, span },
                    None => DragEffect::Canceled {
                        span: Some(span),
                        reason: DragCancelReason::NoCandidate,
                    },
                }
            }
            (DragState::Dragging { span, .. }, DragInput::Cancel { reason }) => {
                self.state = DragState::Idle;
                DragEffect::Canceled {
                    span: Some(span),
                    reason,
                }
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        };
        match effect {
            DragEffect::CandidateUpdated { .. } => tracing::trace!(
                target: TRACE_TARGET,
                transition_id = transition.transition_id,
                effect = ?effect,
                "drag candidate updated"
            ),
            _ => tracing::debug!(
                target: TRACE_TARGET,
                transition_id = transition.transition_id,
                effect = ?effect,
                "drag transition"
            ),
        }
        transition
    }
}
