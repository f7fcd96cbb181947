//! The panel block store.
//!
//! # Invariants
//!
//! After every public mutation:
//! - every block lies inside `[0, cols) x [0, rows)`;
//! - every span is admitted by the store's [`SpanLimits`];
//! - ids are unique;
//! - no two blocks share a cell.
//!
//! Mutations build the next block list off to the side and commit it with a
//! single assignment plus a `revision` bump, so a failed operation leaves the
//! store exactly as it was.

use panelwall_core::{GridCell, GridRect, GridSpan};
use rustc_hash::FxHashSet;

use crate::block::{BlockId, BlockIdAllocator, LayoutModelError, LockedJoints, PanelBlock, SpanLimits};

const TRACE_TARGET: &str = "panelwall.layout";

/// Result of a destructive placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Id of the newly inserted block.
    pub id: BlockId,
    /// Blocks removed because they intersected the new one.
    pub displaced: Vec<PanelBlock>,
}

/// Ordered collection of non-overlapping panel blocks on a `cols x rows` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutStore {
    cols: u16,
    rows: u16,
    limits: SpanLimits,
    blocks: Vec<PanelBlock>,
    ids: BlockIdAllocator,
    revision: u64,
}

impl LayoutStore {
    /// An empty store.
    #[must_use]
    pub fn new(cols: u16, rows: u16, limits: SpanLimits) -> Self {
        Self {
            cols,
            rows,
            limits,
            blocks: Vec::new(),
            ids: BlockIdAllocator::default(),
            revision: 0,
        }
    }

    /// A store seeded with existing blocks, e.g. from a loaded document.
    ///
    /// The blocks must already satisfy every store invariant. New ids continue
    /// after the largest one present.
    pub fn from_blocks(
        cols: u16,
        rows: u16,
        limits: SpanLimits,
        blocks: Vec<PanelBlock>,
    ) -> Result<Self, LayoutModelError> {
        let ids = BlockIdAllocator::after(&blocks)?;
        let store = Self {
            cols,
            rows,
            limits,
            blocks,
            ids,
            revision: 0,
        };
        store.validate()?;
        Ok(store)
    }

    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub const fn limits(&self) -> SpanLimits {
        self.limits
    }

    /// Monotonic counter bumped on every committed mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn blocks(&self) -> &[PanelBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&PanelBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// The block covering `cell`, if any.
    #[must_use]
    pub fn block_at(&self, cell: GridCell) -> Option<&PanelBlock> {
        self.blocks
            .iter()
            .find(|block| block.rect().contains_cell(cell))
    }

    /// Blocks that intersect `rect`.
    #[must_use]
    pub fn overlaps(&self, rect: &GridRect) -> Vec<&PanelBlock> {
        self.blocks
            .iter()
            .filter(|block| block.rect().intersects(rect))
            .collect()
    }

    /// Check that `rect` is a legal block footprint on this grid.
    pub fn check_candidate(&self, rect: &GridRect) -> Result<(), LayoutModelError> {
        if !self.limits.admits(rect.span()) {
            return Err(LayoutModelError::SpanOutOfLimits {
                span: rect.span(),
                limits: self.limits,
            });
        }
        if !rect.fits_within(self.cols, self.rows) {
            return Err(LayoutModelError::OutOfBounds {
                rect: *rect,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// Discard every block and auto-fill a `cols x rows` grid.
    ///
    /// Cells are tiled row-major with double-height unit blocks (`1x2`); when
    /// `rows` is odd the last band is `1x1`. A height limit of 1 tiles every
    /// band as `1x1`. Fill blocks pin no seams.
    pub(crate) fn regenerate(&mut self, cols: u16, rows: u16) -> Result<(), LayoutModelError> {
        let band = self.limits.max_height.clamp(1, 2);
        let mut ids = self.ids.clone();
        let bands = usize::from(rows).div_ceil(usize::from(band));
        let mut next = Vec::with_capacity(usize::from(cols) * bands);
        let mut row = 0;
        while row < rows {
            let h = band.min(rows - row);
            for col in 0..cols {
                next.push(PanelBlock::new(
                    ids.allocate()?,
                    GridRect::new(col, row, 1, h),
                    LockedJoints::none(),
                ));
            }
            row += h;
        }
        self.cols = cols;
        self.rows = rows;
        self.ids = ids;
        tracing::debug!(
            target: TRACE_TARGET,
            cols,
            rows,
            blocks = next.len(),
            "regenerated layout"
        );
        self.commit(next);
        Ok(())
    }

    /// Remove every block, keeping the grid size.
    pub fn clear(&mut self) -> Vec<PanelBlock> {
        let removed = std::mem::take(&mut self.blocks);
        tracing::debug!(target: TRACE_TARGET, removed = removed.len(), "cleared layout");
        self.commit(Vec::new());
        removed
    }

    /// Destructive placement: insert a block at `rect`, removing every block
    /// it intersects.
    ///
    /// Rejects, without mutating, a rect outside the grid or a span outside
    /// the store's limits.
    pub fn place(
        &mut self,
        rect: GridRect,
        locked_joints: LockedJoints,
    ) -> Result<Placement, LayoutModelError> {
        self.check_candidate(&rect)?;
        let mut ids = self.ids.clone();
        let id = ids.allocate()?;

        let (displaced, mut next): (Vec<_>, Vec<_>) = self
            .blocks
            .iter()
            .cloned()
            .partition(|block| block.rect().intersects(&rect));
        next.push(PanelBlock::new(id, rect, locked_joints));

        self.ids = ids;
        tracing::debug!(
            target: TRACE_TARGET,
            block = id.get(),
            col = rect.col,
            row = rect.row,
            w = rect.w,
            h = rect.h,
            displaced = displaced.len(),
            "placed block"
        );
        self.commit(next);
        Ok(Placement { id, displaced })
    }

    /// Remove the given blocks.
    ///
    /// Fails without mutating if any id is unknown.
    pub fn remove(&mut self, ids: &[BlockId]) -> Result<Vec<PanelBlock>, LayoutModelError> {
        let targets = self.known_ids(ids)?;
        let (removed, next): (Vec<_>, Vec<_>) = self
            .blocks
            .iter()
            .cloned()
            .partition(|block| targets.contains(&block.id));
        tracing::debug!(target: TRACE_TARGET, removed = removed.len(), "removed blocks");
        self.commit(next);
        Ok(removed)
    }

    /// Replace the given blocks with a single new block at `rect`.
    ///
    /// Refuses, without mutating, when `rect` is illegal or would intersect a
    /// block that is not being replaced.
    pub fn replace(
        &mut self,
        ids: &[BlockId],
        rect: GridRect,
    ) -> Result<BlockId, LayoutModelError> {
        let created = self.replace_with(ids, &[rect])?;
        created
            .first()
            .copied()
            .ok_or(LayoutModelError::OutOfBounds {
                rect,
                cols: self.cols,
                rows: self.rows,
            })
    }

    /// Replace the given blocks with one new unlocked block per rect.
    ///
    /// The new rects must be legal, must not intersect each other, and must not
    /// intersect any block outside `ids`.
    pub fn replace_with(
        &mut self,
        ids: &[BlockId],
        rects: &[GridRect],
    ) -> Result<Vec<BlockId>, LayoutModelError> {
        let targets = self.known_ids(ids)?;
        for (index, rect) in rects.iter().enumerate() {
            self.check_candidate(rect)?;
            if let Some(blocker) = self
                .blocks
                .iter()
                .find(|block| !targets.contains(&block.id) && block.rect().intersects(rect))
            {
                return Err(LayoutModelError::PlacementConflict {
                    rect: *rect,
                    blocker: blocker.id,
                });
            }
            if rects[..index].iter().any(|earlier| earlier.intersects(rect)) {
                return Err(LayoutModelError::PlacementConflict {
                    rect: *rect,
                    blocker: ids.first().copied().unwrap_or(BlockId::MIN),
                });
            }
        }

        let mut allocator = self.ids.clone();
        let mut next: Vec<PanelBlock> = self
            .blocks
            .iter()
            .filter(|block| !targets.contains(&block.id))
            .cloned()
            .collect();
        let mut created = Vec::with_capacity(rects.len());
        for rect in rects {
            let id = allocator.allocate()?;
            next.push(PanelBlock::new(id, *rect, LockedJoints::none()));
            created.push(id);
        }

        self.ids = allocator;
        tracing::debug!(
            target: TRACE_TARGET,
            replaced = targets.len(),
            created = created.len(),
            "replaced blocks"
        );
        self.commit(next);
        Ok(created)
    }

    /// Check every store invariant.
    pub fn validate(&self) -> Result<(), LayoutModelError> {
        let mut seen = FxHashSet::default();
        for block in &self.blocks {
            if !seen.insert(block.id) {
                return Err(LayoutModelError::DuplicateBlockId { id: block.id });
            }
            self.check_candidate(&block.rect())?;
        }
        for (index, block) in self.blocks.iter().enumerate() {
            let rect = block.rect();
            if let Some(other) = self.blocks[index + 1..]
                .iter()
                .find(|other| other.rect().intersects(&rect))
            {
                return Err(LayoutModelError::Overlap {
                    first: block.id,
                    second: other.id,
                });
            }
        }
        Ok(())
    }

    /// Total covered area in cells.
    #[must_use]
    pub fn covered_area(&self) -> u32 {
        self.blocks.iter().map(|block| block.span.area()).sum()
    }

    /// Spans of all blocks, in store order.
    pub fn spans(&self) -> impl Iterator<Item = GridSpan> + '_ {
        self.blocks.iter().map(|block| block.span)
    }

    fn known_ids(&self, ids: &[BlockId]) -> Result<FxHashSet<BlockId>, LayoutModelError> {
        let mut targets = FxHashSet::default();
        for &id in ids {
            if !self.contains(id) {
                return Err(LayoutModelError::UnknownBlock { id });
            }
            targets.insert(id);
        }
        Ok(targets)
    }

    fn commit(&mut self, next: Vec<PanelBlock>) {
        self.blocks = next;
        self.revision = self.revision.wrapping_add(1);
        debug_assert!(
            self.validate().is_ok(),
            "layout store invariant violated: {:?}",
            self.validate()
        );
    }
}
