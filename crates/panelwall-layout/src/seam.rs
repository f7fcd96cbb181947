//! Seams: the reveal lines between modules.
//!
//! A vertical seam `i` runs between columns `i - 1` and `i`; seam `0` is the
//! left wall edge and seam `cols` the right edge. Horizontal seams index row
//! boundaries the same way.
//!
//! This module holds three things:
//! - [`SeamRegistry`], the union of seams pinned by drag-placed blocks;
//! - [`SeamFocus`], the hovered and selected seam shown by an overlay;
//! - [`toggle_seam_joint`], which splits blocks across a seam or joins the
//!   pairs that meet at it.

use std::collections::BTreeSet;

use panelwall_core::GridRect;
use serde::{Deserialize, Serialize};

use crate::block::{BlockId, LayoutModelError, PanelBlock};
use crate::grid::WallGeometry;
use crate::store::LayoutStore;

/// Orientation of a seam line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamAxis {
    /// Column boundary.
    Vertical,
    /// Row boundary.
    Horizontal,
}

/// One seam line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seam {
    pub axis: SeamAxis,
    pub index: u16,
}

impl Seam {
    #[must_use]
    pub const fn new(axis: SeamAxis, index: u16) -> Self {
        Self { axis, index }
    }

    #[must_use]
    pub const fn vertical(index: u16) -> Self {
        Self::new(SeamAxis::Vertical, index)
    }

    #[must_use]
    pub const fn horizontal(index: u16) -> Self {
        Self::new(SeamAxis::Horizontal, index)
    }

    /// Whether the seam is strictly inside the grid (not a wall edge).
    #[must_use]
    pub const fn is_interior(&self, cols: u16, rows: u16) -> bool {
        let last = match self.axis {
            SeamAxis::Vertical => cols,
            SeamAxis::Horizontal => rows,
        };
        self.index > 0 && self.index < last
    }

    /// Whether `rect` crosses this seam (covers cells on both sides).
    #[must_use]
    pub const fn splits(&self, rect: &GridRect) -> bool {
        match self.axis {
            SeamAxis::Vertical => rect.col < self.index && self.index < rect.right(),
            SeamAxis::Horizontal => rect.row < self.index && self.index < rect.bottom(),
        }
    }
}

/// Union of seams pinned by blocks' locked joints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeamRegistry {
    vertical: BTreeSet<u16>,
    horizontal: BTreeSet<u16>,
}

impl SeamRegistry {
    #[must_use]
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a PanelBlock>) -> Self {
        let mut registry = Self::default();
        for block in blocks {
            registry.vertical.extend(&block.locked_joints.v);
            registry.horizontal.extend(&block.locked_joints.h);
        }
        registry
    }

    #[must_use]
    pub fn locked_vertical(&self) -> &BTreeSet<u16> {
        &self.vertical
    }

    #[must_use]
    pub fn locked_horizontal(&self) -> &BTreeSet<u16> {
        &self.horizontal
    }

    #[must_use]
    pub fn is_locked(&self, seam: Seam) -> bool {
        match seam.axis {
            SeamAxis::Vertical => self.vertical.contains(&seam.index),
            SeamAxis::Horizontal => self.horizontal.contains(&seam.index),
        }
    }

    /// Every locked seam, vertical first.
    pub fn iter(&self) -> impl Iterator<Item = Seam> + '_ {
        self.vertical
            .iter()
            .map(|&index| Seam::vertical(index))
            .chain(self.horizontal.iter().map(|&index| Seam::horizontal(index)))
    }
}

/// Hover and selection state for the seam overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeamFocus {
    hovered: Option<Seam>,
    selected: Option<Seam>,
}

impl SeamFocus {
    #[must_use]
    pub const fn hovered(&self) -> Option<Seam> {
        self.hovered
    }

    #[must_use]
    pub const fn selected(&self) -> Option<Seam> {
        self.selected
    }

    /// Set the hovered seam. Seams outside `geometry` clear the hover.
    ///
    /// Returns whether the hover changed.
    pub fn hover(&mut self, seam: Option<Seam>, geometry: &WallGeometry) -> bool {
        let next = seam.filter(|seam| geometry.has_seam(*seam));
        let changed = next != self.hovered;
        self.hovered = next;
        changed
    }

    /// Select `seam`, or deselect it if it is already selected.
    ///
    /// Seams outside `geometry` are ignored. Returns whether the selection
    /// changed.
    pub fn toggle(&mut self, seam: Seam, geometry: &WallGeometry) -> bool {
        if !geometry.has_seam(seam) {
            return false;
        }
        self.selected = if self.selected == Some(seam) {
            None
        } else {
            Some(seam)
        };
        true
    }

    /// Drop focus on seams that no longer exist after a geometry change.
    pub fn retain_within(&mut self, geometry: &WallGeometry) {
        self.hovered = self.hovered.filter(|seam| geometry.has_seam(*seam));
        self.selected = self.selected.filter(|seam| geometry.has_seam(*seam));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What a seam toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamJointKind {
    /// Straddling blocks were cut in two.
    Split,
    /// Pairs meeting at the seam were fused.
    Join,
}

/// A committed seam join or split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeamJointChange {
    pub seam: Seam,
    pub kind: SeamJointKind,
    pub removed: Vec<BlockId>,
    pub created: Vec<BlockId>,
}

/// Why a seam toggle left the store untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum SeamJointNoop {
    /// Wall edges cannot be split or joined.
    BoundarySeam,
    /// The seam index lies outside the grid.
    OutOfRange,
    /// Nothing crosses the seam and no pair can be joined there.
    NothingToJoin,
    /// The store refused the rewrite.
    Rejected(LayoutModelError),
}

/// Split or join blocks at `seam`.
///
/// If any block crosses the seam, every crossing block is split there.
/// Otherwise each pair of blocks that meet at the seam with the same extent
/// along it is joined, provided the joined span fits the store's limits.
/// New blocks carry no locked joints.
pub fn toggle_seam_joint(
    store: &mut LayoutStore,
    seam: Seam,
) -> Result<SeamJointChange, SeamJointNoop> {
    let last = match seam.axis {
        SeamAxis::Vertical => store.cols(),
        SeamAxis::Horizontal => store.rows(),
    };
    if seam.index > last {
        return Err(SeamJointNoop::OutOfRange);
    }
    if !seam.is_interior(store.cols(), store.rows()) {
        return Err(SeamJointNoop::BoundarySeam);
    }

    let straddlers: Vec<&PanelBlock> = store
        .blocks()
        .iter()
        .filter(|block| seam.splits(&block.rect()))
        .collect();

    let (kind, removed, rects) = if straddlers.is_empty() {
        let (removed, rects) = joinable_pairs(store, seam);
        if removed.is_empty() {
            return Err(SeamJointNoop::NothingToJoin);
        }
        (SeamJointKind::Join, removed, rects)
    } else {
        let removed: Vec<BlockId> = straddlers.iter().map(|block| block.id).collect();
        let rects = straddlers
            .iter()
            .flat_map(|block| {
                let (first, second) = split_at(&block.rect(), seam);
                [first, second]
            })
            .collect::<Vec<_>>();
        (SeamJointKind::Split, removed, rects)
    };

    let created = store
        .replace_with(&removed, &rects)
        .map_err(SeamJointNoop::Rejected)?;
    tracing::debug!(
        target: "panelwall.layout",
        axis = ?seam.axis,
        index = seam.index,
        kind = ?kind,
        removed = removed.len(),
        created = created.len(),
        "toggled seam joint"
    );
    Ok(SeamJointChange {
        seam,
        kind,
        removed,
        created,
    })
}

fn split_at(rect: &GridRect, seam: Seam) -> (GridRect, GridRect) {
    match seam.axis {
        SeamAxis::Vertical => (
            GridRect::new(rect.col, rect.row, seam.index - rect.col, rect.h),
            GridRect::new(seam.index, rect.row, rect.right() - seam.index, rect.h),
        ),
        SeamAxis::Horizontal => (
            GridRect::new(rect.col, rect.row, rect.w, seam.index - rect.row),
            GridRect::new(rect.col, seam.index, rect.w, rect.bottom() - seam.index),
        ),
    }
}

fn joined(first: &GridRect, second: &GridRect, seam: Seam) -> Option<GridRect> {
    match seam.axis {
        SeamAxis::Vertical => (first.right() == seam.index
            && second.col == seam.index
            && first.row == second.row
            && first.h == second.h)
            .then(|| GridRect::new(first.col, first.row, first.w + second.w, first.h)),
        SeamAxis::Horizontal => (first.bottom() == seam.index
            && second.row == seam.index
            && first.col == second.col
            && first.w == second.w)
            .then(|| GridRect::new(first.col, first.row, first.w, first.h + second.h)),
    }
}

fn joinable_pairs(store: &LayoutStore, seam: Seam) -> (Vec<BlockId>, Vec<GridRect>) {
    let limits = store.limits();
    let mut removed = Vec::new();
    let mut rects = Vec::new();
    for first in store.blocks() {
        for second in store.blocks() {
            if let Some(rect) = joined(&first.rect(), &second.rect(), seam)
                && limits.admits(rect.span())
            {
                removed.extend([first.id, second.id]);
                rects.push(rect);
            }
        }
    }
    (removed, rects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{LockedJoints, SpanLimits};
    use crate::grid::{GapBounds, GridSpec};

    fn store_with(rects: &[GridRect]) -> LayoutStore {
        let mut store = LayoutStore::new(7, 5, SpanLimits::default());
        for rect in rects {
            store.place(*rect, LockedJoints::none()).expect("place");
        }
        store
    }

    fn rects(store: &LayoutStore) -> Vec<GridRect> {
        let mut rects: Vec<_> = store.blocks().iter().map(PanelBlock::rect).collect();
        rects.sort_by_key(|rect| (rect.row, rect.col));
        rects
    }

    #[test]
    fn registry_unions_locked_joints() {
        let mut store = LayoutStore::new(7, 5, SpanLimits::default());
        let a = GridRect::new(2, 0, 1, 3);
        let b = GridRect::new(4, 1, 2, 2);
        store.place(a, LockedJoints::bounding(&a)).expect("a");
        store.place(b, LockedJoints::bounding(&b)).expect("b");
        store
            .place(GridRect::new(0, 4, 1, 1), LockedJoints::none())
            .expect("unlocked");
        let registry = SeamRegistry::from_blocks(store.blocks());
        assert_eq!(
            registry.locked_vertical().iter().copied().collect::<Vec<_>>(),
            vec![2, 3, 4, 6]
        );
        assert_eq!(
            registry.locked_horizontal().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 3]
        );
        assert!(registry.is_locked(Seam::vertical(6)));
        assert!(!registry.is_locked(Seam::horizontal(4)));
        assert_eq!(registry.iter().count(), 7);
    }

    #[test]
    fn focus_ignores_seams_outside_geometry() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        let mut focus = SeamFocus::default();
        assert!(!focus.toggle(Seam::vertical(9), &geometry));
        assert!(focus.toggle(Seam::vertical(3), &geometry));
        assert_eq!(focus.selected(), Some(Seam::vertical(3)));
        assert!(focus.toggle(Seam::vertical(3), &geometry));
        assert_eq!(focus.selected(), None);

        assert!(focus.hover(Some(Seam::horizontal(2)), &geometry));
        assert!(!focus.hover(Some(Seam::horizontal(2)), &geometry));
        assert!(focus.hover(Some(Seam::horizontal(40)), &geometry));
        assert_eq!(focus.hovered(), None);
    }

    #[test]
    fn joins_matching_pairs_across_vertical_seam() {
        let mut store = store_with(&[
            GridRect::new(2, 0, 1, 2),
            GridRect::new(3, 0, 1, 2),
            GridRect::new(2, 2, 1, 2),
            GridRect::new(3, 2, 1, 1),
        ]);
        let change = toggle_seam_joint(&mut store, Seam::vertical(3)).expect("join");
        assert_eq!(change.kind, SeamJointKind::Join);
        assert_eq!(change.created.len(), 1);
        assert_eq!(
            rects(&store),
            vec![
                GridRect::new(2, 0, 2, 2),
                GridRect::new(2, 2, 1, 2),
                GridRect::new(3, 2, 1, 1),
            ]
        );
    }

    #[test]
    fn splits_straddlers_before_joining() {
        let mut store = store_with(&[GridRect::new(2, 0, 2, 2), GridRect::new(1, 2, 1, 1)]);
        let change = toggle_seam_joint(&mut store, Seam::vertical(3)).expect("split");
        assert_eq!(change.kind, SeamJointKind::Split);
        assert_eq!(
            rects(&store),
            vec![
                GridRect::new(2, 0, 1, 2),
                GridRect::new(3, 0, 1, 2),
                GridRect::new(1, 2, 1, 1),
            ]
        );
        // Toggling again restores the joined block.
        toggle_seam_joint(&mut store, Seam::vertical(3)).expect("join");
        assert!(rects(&store).contains(&GridRect::new(2, 0, 2, 2)));
    }

    #[test]
    fn horizontal_split_cuts_tall_block() {
        let mut store = store_with(&[GridRect::new(0, 0, 1, 4)]);
        toggle_seam_joint(&mut store, Seam::horizontal(1)).expect("split");
        assert_eq!(
            rects(&store),
            vec![GridRect::new(0, 0, 1, 1), GridRect::new(0, 1, 1, 3)]
        );
    }

    #[test]
    fn join_respects_span_limits() {
        let mut store = store_with(&[GridRect::new(0, 0, 1, 3), GridRect::new(0, 3, 1, 2)]);
        assert_eq!(
            toggle_seam_joint(&mut store, Seam::horizontal(3))
                .map(|change| change.kind),
            Ok(SeamJointKind::Join)
        );
        let mut store = store_with(&[GridRect::new(0, 0, 3, 1), GridRect::new(3, 0, 2, 1)]);
        let before = store.clone();
        assert_eq!(
            toggle_seam_joint(&mut store, Seam::vertical(3)),
            Err(SeamJointNoop::NothingToJoin)
        );
        assert_eq!(store, before);
    }

    #[test]
    fn boundary_and_out_of_range_seams_are_noops() {
        let mut store = store_with(&[GridRect::new(0, 0, 1, 2)]);
        assert_eq!(
            toggle_seam_joint(&mut store, Seam::vertical(0)),
            Err(SeamJointNoop::BoundarySeam)
        );
        assert_eq!(
            toggle_seam_joint(&mut store, Seam::vertical(7)),
            Err(SeamJointNoop::BoundarySeam)
        );
        assert_eq!(
            toggle_seam_joint(&mut store, Seam::horizontal(6)),
            Err(SeamJointNoop::OutOfRange)
        );
    }
}
