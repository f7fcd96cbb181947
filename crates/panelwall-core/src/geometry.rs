#![forbid(unsafe_code)]

//! Grid-space primitives.
//!
//! All coordinates are 0-indexed cells with the origin at the top-left of the
//! wall. Rectangles are half-open: a block at column 2 with width 1 occupies
//! column range `[2, 3)`.

use serde::{Deserialize, Serialize};

/// One cell of the wall grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct GridCell {
    /// Column index (left to right).
    pub col: u16,
    /// Row index (top to bottom).
    pub row: u16,
}

impl GridCell {
    /// Create a new cell.
    #[inline]
    #[must_use]
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }
}

/// Width and height of a block, in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpan {
    pub w: u16,
    pub h: u16,
}

impl GridSpan {
    /// The single-module span.
    pub const UNIT: Self = Self { w: 1, h: 1 };

    /// Create a new span.
    #[inline]
    #[must_use]
    pub const fn new(w: u16, h: u16) -> Self {
        Self { w, h }
    }

    /// Whether this is the `1×1` span.
    #[inline]
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        self.w == 1 && self.h == 1
    }

    /// Area in cells.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.w as u32 * self.h as u32
    }
}

impl Default for GridSpan {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Signed cell coordinate as produced by pointer projection.
///
/// Unlike [`GridCell`] this may lie outside the wall (negative or past the
/// last column/row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RawCell {
    pub col: i32,
    pub row: i32,
}

impl RawCell {
    #[inline]
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Convert to a grid cell, or `None` when either axis is negative or
    /// does not fit in `u16`.
    #[must_use]
    pub fn to_cell(self) -> Option<GridCell> {
        let col = u16::try_from(self.col).ok()?;
        let row = u16::try_from(self.row).ok()?;
        Some(GridCell::new(col, row))
    }
}

/// Half-open rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Left column (inclusive).
    pub col: u16,
    /// Top row (inclusive).
    pub row: u16,
    /// Width in cells.
    pub w: u16,
    /// Height in cells.
    pub h: u16,
}

impl GridRect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(col: u16, row: u16, w: u16, h: u16) -> Self {
        Self { col, row, w, h }
    }

    /// Build from an origin cell and a span.
    #[inline]
    #[must_use]
    pub const fn from_parts(origin: GridCell, span: GridSpan) -> Self {
        Self::new(origin.col, origin.row, span.w, span.h)
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> GridCell {
        GridCell::new(self.col, self.row)
    }

    #[inline]
    #[must_use]
    pub const fn span(&self) -> GridSpan {
        GridSpan::new(self.w, self.h)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.col.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.row.saturating_add(self.h)
    }

    /// Area in cells.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.w as u32 * self.h as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Two rectangles overlap iff both their column ranges and their row
    /// ranges intersect.
    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &GridRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.col < other.right()
            && other.col < self.right()
            && self.row < other.bottom()
            && other.row < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[inline]
    #[must_use]
    pub const fn contains_rect(&self, other: &GridRect) -> bool {
        other.col >= self.col
            && other.row >= self.row
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if a cell is inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains_cell(&self, cell: GridCell) -> bool {
        cell.col >= self.col
            && cell.col < self.right()
            && cell.row >= self.row
            && cell.row < self.bottom()
    }

    /// Whether the rectangle is non-empty and lies within `[0, cols) x [0, rows)`.
    #[inline]
    #[must_use]
    pub fn fits_within(&self, cols: u16, rows: u16) -> bool {
        !self.is_empty()
            && u32::from(self.col) + u32::from(self.w) <= u32::from(cols)
            && u32::from(self.row) + u32::from(self.h) <= u32::from(rows)
    }

    /// Iterate every cell covered by the rectangle, row-major.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let (col, right) = (self.col, self.right());
        (self.row..self.bottom())
            .flat_map(move |row| (col..right).map(move |c| GridCell::new(c, row)))
    }
}
