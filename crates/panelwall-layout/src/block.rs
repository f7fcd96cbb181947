//! Panel block model: ids, locked joints, span limits and model errors.

use std::collections::BTreeSet;
use std::fmt;

use panelwall_core::{GridCell, GridRect, GridSpan};
use serde::{Deserialize, Serialize};

use crate::document::LAYOUT_DOCUMENT_SCHEMA_VERSION;

/// Stable identifier for panel blocks.
///
/// `0` is reserved/invalid so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    /// Lowest valid block id.
    pub const MIN: Self = Self(1);

    /// Create a new block id, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, LayoutModelError> {
        if raw == 0 {
            return Err(LayoutModelError::ZeroBlockId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next id, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, LayoutModelError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(LayoutModelError::BlockIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for block ids.
///
/// Ids are never handed out twice for the lifetime of a layout, including
/// across regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIdAllocator {
    next: BlockId,
}

impl BlockIdAllocator {
    /// Start allocating from a known id.
    #[must_use]
    pub const fn with_next(next: BlockId) -> Self {
        Self { next }
    }

    /// Allocator that continues after the largest id in `blocks`.
    pub fn after<'a>(
        blocks: impl IntoIterator<Item = &'a PanelBlock>,
    ) -> Result<Self, LayoutModelError> {
        match blocks.into_iter().map(|block| block.id).max() {
            Some(max) => Ok(Self::with_next(max.checked_next()?)),
            None => Ok(Self::default()),
        }
    }

    /// Peek at the next id without consuming.
    #[must_use]
    pub const fn peek(&self) -> BlockId {
        self.next
    }

    /// Allocate the next id and advance.
    pub fn allocate(&mut self) -> Result<BlockId, LayoutModelError> {
        let current = self.next;
        self.next = self.next.checked_next()?;
        Ok(current)
    }
}

impl Default for BlockIdAllocator {
    fn default() -> Self {
        Self {
            next: BlockId::MIN,
        }
    }
}

/// Seam indices pinned by a block.
///
/// `v` holds vertical seam indices (column boundaries), `h` horizontal seam
/// indices (row boundaries).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LockedJoints {
    pub v: BTreeSet<u16>,
    pub h: BTreeSet<u16>,
}

impl LockedJoints {
    /// No pinned seams.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The four seams bounding `rect`.
    #[must_use]
    pub fn bounding(rect: &GridRect) -> Self {
        Self {
            v: BTreeSet::from([rect.col, rect.right()]),
            h: BTreeSet::from([rect.row, rect.bottom()]),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.v.is_empty() && self.h.is_empty()
    }
}

/// One rectangular panel on the wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelBlock {
    pub id: BlockId,
    pub origin: GridCell,
    pub span: GridSpan,
    #[serde(default)]
    pub locked_joints: LockedJoints,
}

impl PanelBlock {
    #[must_use]
    pub fn new(id: BlockId, rect: GridRect, locked_joints: LockedJoints) -> Self {
        Self {
            id,
            origin: rect.origin(),
            span: rect.span(),
            locked_joints,
        }
    }

    /// The cells this block covers.
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::from_parts(self.origin, self.span)
    }

    /// Whether the block pins any seam.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !self.locked_joints.is_empty()
    }
}

/// Maximum block span per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanLimits {
    pub max_width: u16,
    pub max_height: u16,
}

impl SpanLimits {
    pub fn new(max_width: u16, max_height: u16) -> Result<Self, LayoutModelError> {
        if max_width == 0 || max_height == 0 {
            return Err(LayoutModelError::InvalidSpanLimits {
                max_width,
                max_height,
            });
        }
        Ok(Self {
            max_width,
            max_height,
        })
    }

    /// Whether `span` is at least `1×1` and within both maxima.
    #[must_use]
    pub const fn admits(&self, span: GridSpan) -> bool {
        span.w >= 1 && span.h >= 1 && span.w <= self.max_width && span.h <= self.max_height
    }
}

impl Default for SpanLimits {
    fn default() -> Self {
        Self {
            max_width: 4,
            max_height: 5,
        }
    }
}

/// Validation errors for the layout model.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutModelError {
    ZeroBlockId,
    BlockIdOverflow {
        current: BlockId,
    },
    DuplicateBlockId {
        id: BlockId,
    },
    InvalidGapBounds {
        min: f64,
        max: f64,
    },
    InvalidSpanLimits {
        max_width: u16,
        max_height: u16,
    },
    InvalidCellSize {
        cell: f64,
    },
    InvalidWallLimits {
        min: f64,
        max: f64,
    },
    SpanOutOfLimits {
        span: GridSpan,
        limits: SpanLimits,
    },
    OutOfBounds {
        rect: GridRect,
        cols: u16,
        rows: u16,
    },
    Overlap {
        first: BlockId,
        second: BlockId,
    },
    PlacementConflict {
        rect: GridRect,
        blocker: BlockId,
    },
    UnknownBlock {
        id: BlockId,
    },
    UnsupportedSchemaVersion {
        version: u16,
    },
}

impl fmt::Display for LayoutModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBlockId => write!(f, "block id 0 is invalid"),
            Self::BlockIdOverflow { current } => {
                write!(f, "block id overflow after {}", current.0)
            }
            Self::DuplicateBlockId { id } => write!(f, "duplicate block id {}", id.0),
            Self::InvalidGapBounds { min, max } => {
                write!(f, "invalid joint bounds [{min}, {max}]")
            }
            Self::InvalidSpanLimits {
                max_width,
                max_height,
            } => write!(f, "invalid span limits {max_width}x{max_height}"),
            Self::InvalidCellSize { cell } => write!(f, "invalid grid cell size {cell}"),
            Self::InvalidWallLimits { min, max } => {
                write!(f, "invalid wall size limits [{min}, {max}]")
            }
            Self::SpanOutOfLimits { span, limits } => write!(
                f,
                "span {}x{} exceeds limits {}x{}",
                span.w, span.h, limits.max_width, limits.max_height
            ),
            Self::OutOfBounds { rect, cols, rows } => write!(
                f,
                "block at ({}, {}) {}x{} leaves the {cols}x{rows} grid",
                rect.col, rect.row, rect.w, rect.h
            ),
            Self::Overlap { first, second } => {
                write!(f, "blocks {} and {} overlap", first.0, second.0)
            }
            Self::PlacementConflict { rect, blocker } => write!(
                f,
                "block {} blocks placement at ({}, {}) {}x{}",
                blocker.0, rect.col, rect.row, rect.w, rect.h
            ),
            Self::UnknownBlock { id } => write!(f, "block {} not found", id.0),
            Self::UnsupportedSchemaVersion { version } => write!(
                f,
                "unsupported layout schema version {version} (expected {LAYOUT_DOCUMENT_SCHEMA_VERSION})"
            ),
        }
    }
}

impl std::error::Error for LayoutModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_is_rejected() {
        assert_eq!(BlockId::new(0), Err(LayoutModelError::ZeroBlockId));
        assert_eq!(BlockId::new(7).map(BlockId::get), Ok(7));
    }

    #[test]
    fn allocator_is_monotonic_and_overflow_checked() {
        let mut ids = BlockIdAllocator::default();
        assert_eq!(ids.allocate(), Ok(BlockId::MIN));
        assert_eq!(ids.peek().get(), 2);

        let last = BlockId::new(u64::MAX).expect("non-zero");
        let mut ids = BlockIdAllocator::with_next(last);
        assert!(matches!(
            ids.allocate(),
            Err(LayoutModelError::BlockIdOverflow { .. })
        ));
    }

    #[test]
    fn allocator_continues_after_existing_blocks() {
        let blocks = [
            PanelBlock::new(
                BlockId::new(3).expect("non-zero"),
                GridRect::new(0, 0, 1, 1),
                LockedJoints::none(),
            ),
            PanelBlock::new(
                BlockId::new(9).expect("non-zero"),
                GridRect::new(1, 0, 1, 1),
                LockedJoints::none(),
            ),
        ];
        let ids = BlockIdAllocator::after(&blocks).expect("room for more ids");
        assert_eq!(ids.peek().get(), 10);
    }

    #[test]
    fn bounding_joints_pin_all_four_edges() {
        let joints = LockedJoints::bounding(&GridRect::new(2, 0, 1, 3));
        assert_eq!(joints.v.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(joints.h.iter().copied().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn span_limits_admit_inclusive_range() {
        let limits = SpanLimits::default();
        assert!(limits.admits(GridSpan::new(4, 5)));
        assert!(!limits.admits(GridSpan::new(5, 1)));
        assert!(!limits.admits(GridSpan::new(1, 6)));
        assert!(!limits.admits(GridSpan::new(0, 1)));
        assert!(SpanLimits::new(0, 3).is_err());
    }

    #[test]
    fn block_serializes_camel_case() {
        let block = PanelBlock::new(
            BlockId::MIN,
            GridRect::new(2, 0, 1, 3),
            LockedJoints::bounding(&GridRect::new(2, 0, 1, 3)),
        );
        let json = serde_json::to_value(&block).expect("serialize block");
        assert_eq!(json["origin"]["col"], 2);
        assert_eq!(json["span"]["h"], 3);
        assert_eq!(json["lockedJoints"]["v"], serde_json::json!([2, 3]));
    }

    #[test]
    fn error_messages_name_the_ids() {
        let err = LayoutModelError::Overlap {
            first: BlockId::MIN,
            second: BlockId::new(4).expect("non-zero"),
        };
        assert_eq!(err.to_string(), "blocks 1 and 4 overlap");
    }
}
