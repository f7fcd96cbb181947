//! Reveal-gap solver and derived wall geometry.
//!
//! Columns are solved so that `cols * cell + (cols + 1) * gap == width`
//! exactly whenever some column count yields a gap inside the configured
//! joint bounds. Rows follow a [`RowGapPolicy`]: either a fixed reveal
//! (the default) or the same solver as columns.
//!
//! Geometry is always derived, never stored: [`WallGeometry::solve`] is a pure
//! function of the wall dimensions, the [`GridSpec`] and the joint bounds.

use panelwall_core::{GridRect, RawCell};
use serde::{Deserialize, Serialize};

use crate::block::LayoutModelError;
use crate::seam::{Seam, SeamAxis};

/// Default grid module (inches).
pub const DEFAULT_CELL: f64 = 18.0;

/// Default lower joint bound (inches).
pub const DEFAULT_JOINT_MIN: f64 = 0.25;

/// Default upper joint bound (inches).
pub const DEFAULT_JOINT_MAX: f64 = 3.0;

/// Default fixed reveal between rows (inches).
pub const DEFAULT_ROW_GAP: f64 = 0.25;

/// Tolerance used when comparing solved gaps against bounds.
pub const GAP_EPSILON: f64 = 1e-9;

/// Inclusive bounds on a reveal gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapBounds {
    min: f64,
    max: f64,
}

impl GapBounds {
    /// Validate and build gap bounds.
    ///
    /// Both ends must be finite and non-negative with `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, LayoutModelError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(LayoutModelError::InvalidGapBounds { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> f64 {
        self.max
    }

    /// Whether `gap` lies inside the bounds (with [`GAP_EPSILON`] slack).
    #[must_use]
    pub fn contains(self, gap: f64) -> bool {
        gap >= self.min - GAP_EPSILON && gap <= self.max + GAP_EPSILON
    }
}

impl Default for GapBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_JOINT_MIN,
            max: DEFAULT_JOINT_MAX,
        }
    }
}

/// Solved module count and gap for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSolution {
    /// Number of modules along the axis (always >= 1).
    pub count: u16,
    /// Reveal between modules and at both ends.
    pub gap: f64,
    /// `true` when `count * cell + (count + 1) * gap` closes the axis exactly
    /// with the gap inside its bounds.
    pub exact: bool,
}

impl AxisSolution {
    /// Total extent covered by modules and gaps.
    #[must_use]
    pub fn extent(&self, cell: f64) -> f64 {
        f64::from(self.count) * cell + f64::from(self.count + 1) * self.gap
    }
}

fn axis_gap(length: f64, cell: f64, count: u16) -> f64 {
    (length - f64::from(count) * cell) / f64::from(count + 1)
}

/// Solve the module count and reveal gap for one axis.
///
/// Candidate counts run from 1 to `floor(length / cell)`. The gap shrinks
/// strictly as the count grows, so the first count whose gap falls inside
/// `bounds` is the one closest to `bounds.max()` and also the one with the
/// fewest modules.
///
/// When no count lands inside the bounds the result is best effort and
/// flagged `exact = false`:
/// - the count whose gap is closest to the maximum from below, with the gap
///   raised to the minimum;
/// - if every gap exceeds the maximum, the largest count with the gap capped
///   at the maximum;
/// - if even one module does not fit, one module with a zero gap.
#[must_use]
pub fn solve_axis(length: f64, cell: f64, bounds: GapBounds) -> AxisSolution {
    if !length.is_finite() || !cell.is_finite() || cell <= 0.0 || length < cell {
        return AxisSolution {
            count: 1,
            gap: 0.0,
            exact: false,
        };
    }

    let max_count = (length / cell).floor().min(f64::from(u16::MAX - 1)) as u16;
    let mut widest_over_max = None;
    for count in 1..=max_count {
        let gap = axis_gap(length, cell, count);
        if bounds.contains(gap) {
            return AxisSolution {
                count,
                gap: gap.clamp(bounds.min(), bounds.max()),
                exact: true,
            };
        }
        if gap > bounds.max() {
            widest_over_max = Some(count);
            continue;
        }
        // First gap below the minimum: closest to the maximum from below.
        return AxisSolution {
            count,
            gap: gap.max(bounds.min()).max(0.0),
            exact: false,
        };
    }

    AxisSolution {
        count: widest_over_max.unwrap_or(1),
        gap: bounds.max(),
        exact: false,
    }
}

/// Fixed-gap variant: as many modules as fit with a constant reveal at both
/// ends and between modules.
#[must_use]
pub fn fixed_axis(length: f64, cell: f64, gap: f64) -> AxisSolution {
    let gap = if gap.is_finite() { gap.max(0.0) } else { 0.0 };
    if !length.is_finite() || !cell.is_finite() || cell <= 0.0 {
        return AxisSolution {
            count: 1,
            gap,
            exact: false,
        };
    }
    let fitted = ((length - gap) / (cell + gap)).floor();
    let count = if fitted >= 1.0 {
        fitted.min(f64::from(u16::MAX - 1)) as u16
    } else {
        1
    };
    let closure = f64::from(count) * cell + f64::from(count + 1) * gap;
    AxisSolution {
        count,
        gap,
        exact: (closure - length).abs() <= GAP_EPSILON,
    }
}

/// How the row reveal is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RowGapPolicy {
    /// Constant reveal between rows; the row count is whatever fits.
    Fixed { gap: f64 },
    /// Rows use the same solver and joint bounds as columns.
    Solved,
}

impl Default for RowGapPolicy {
    fn default() -> Self {
        Self::Fixed {
            gap: DEFAULT_ROW_GAP,
        }
    }
}

/// Static grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Module size shared by both axes.
    pub cell: f64,
    /// Row reveal policy.
    pub row_gap: RowGapPolicy,
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), LayoutModelError> {
        if !self.cell.is_finite() || self.cell <= 0.0 {
            return Err(LayoutModelError::InvalidCellSize { cell: self.cell });
        }
        if let RowGapPolicy::Fixed { gap } = self.row_gap
            && (!gap.is_finite() || gap < 0.0)
        {
            return Err(LayoutModelError::InvalidGapBounds { min: gap, max: gap });
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell: DEFAULT_CELL,
            row_gap: RowGapPolicy::default(),
        }
    }
}

/// Visual rectangle of a block face in wall units, measured from the wall's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Solved geometry for a wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallGeometry {
    /// Wall width the geometry was solved for.
    pub width: f64,
    /// Wall height the geometry was solved for.
    pub height: f64,
    pub cell: f64,
    pub cols: u16,
    pub col_gap: f64,
    pub rows: u16,
    pub row_gap: f64,
    /// Whether the column solution closes the wall width exactly.
    pub exact_columns: bool,
}

impl WallGeometry {
    /// Derive geometry from wall dimensions, grid spec and joint bounds.
    #[must_use]
    pub fn solve(width: f64, height: f64, spec: &GridSpec, joints: GapBounds) -> Self {
        let columns = solve_axis(width, spec.cell, joints);
        let rows = match spec.row_gap {
            RowGapPolicy::Fixed { gap } => fixed_axis(height, spec.cell, gap),
            RowGapPolicy::Solved => solve_axis(height, spec.cell, joints),
        };
        Self {
            width,
            height,
            cell: spec.cell,
            cols: columns.count,
            col_gap: columns.gap,
            rows: rows.count,
            row_gap: rows.gap,
            exact_columns: columns.exact,
        }
    }

    /// The full grid as a rectangle.
    #[must_use]
    pub const fn bounds(&self) -> GridRect {
        GridRect::new(0, 0, self.cols, self.rows)
    }

    /// Whether `rect` lies inside the grid.
    #[must_use]
    pub fn contains(&self, rect: &GridRect) -> bool {
        rect.fits_within(self.cols, self.rows)
    }

    /// Face rectangle of a block for the render collaborator.
    ///
    /// `width = w * cell - (w - 1) * col_gap`, `height = h * cell - (h - 1) * row_gap`;
    /// the offset is the cumulative module pitch from the top-left plus the
    /// leading reveal.
    #[must_use]
    pub fn face_rect(&self, rect: &GridRect) -> FaceRect {
        let w = f64::from(rect.w);
        let h = f64::from(rect.h);
        FaceRect {
            x: self.col_gap + f64::from(rect.col) * (self.cell + self.col_gap),
            y: self.row_gap + f64::from(rect.row) * (self.cell + self.row_gap),
            width: w * self.cell - (w - 1.0).max(0.0) * self.col_gap,
            height: h * self.cell - (h - 1.0).max(0.0) * self.row_gap,
        }
    }

    /// Cell under a point measured from the wall's top-left corner.
    ///
    /// Each cell owns the span between the centres of its bounding seams, so
    /// a point inside a reveal snaps to the nearer module. The result may lie
    /// outside the grid; non-finite input yields `None`.
    #[must_use]
    pub fn cell_at(&self, left: f64, top: f64) -> Option<RawCell> {
        if !left.is_finite() || !top.is_finite() {
            return None;
        }
        let col = ((left - self.col_gap / 2.0) / (self.cell + self.col_gap)).floor();
        let row = ((top - self.row_gap / 2.0) / (self.cell + self.row_gap)).floor();
        // `as` saturates for out-of-range floats.
        Some(RawCell::new(col as i32, row as i32))
    }

    /// Number of seam lines along an axis (boundaries included).
    #[must_use]
    pub const fn seam_count(&self, axis: SeamAxis) -> u16 {
        match axis {
            SeamAxis::Vertical => self.cols + 1,
            SeamAxis::Horizontal => self.rows + 1,
        }
    }

    /// Whether the seam exists in this grid.
    #[must_use]
    pub const fn has_seam(&self, seam: Seam) -> bool {
        seam.index < self.seam_count(seam.axis)
    }

    /// Offset of a seam's centre line from the wall's left (vertical seams)
    /// or top (horizontal seams) edge.
    #[must_use]
    pub fn seam_offset(&self, seam: Seam) -> Option<f64> {
        if !self.has_seam(seam) {
            return None;
        }
        let index = f64::from(seam.index);
        Some(match seam.axis {
            SeamAxis::Vertical => index * (self.cell + self.col_gap) + self.col_gap / 2.0,
            SeamAxis::Horizontal => index * (self.cell + self.row_gap) + self.row_gap / 2.0,
        })
    }

    /// Seam whose centre line passes within `radius` of a point measured from
    /// the wall's top-left corner.
    ///
    /// Seam lines run the full wall, so past either end the distance is taken
    /// to the end point. The nearest seam wins; ties go to vertical seams,
    /// then to the lower index.
    #[must_use]
    pub fn seam_near(&self, left: f64, top: f64, radius: f64) -> Option<Seam> {
        if !left.is_finite() || !top.is_finite() || radius.is_nan() || radius < 0.0 {
            return None;
        }
        let overshoot = |value: f64, length: f64| (-value).max(value - length).max(0.0);
        let mut nearest: Option<(Seam, f64)> = None;
        for axis in [SeamAxis::Vertical, SeamAxis::Horizontal] {
            for index in 0..self.seam_count(axis) {
                let seam = Seam::new(axis, index);
                let Some(offset) = self.seam_offset(seam) else {
                    continue;
                };
                let distance = match axis {
                    SeamAxis::Vertical => (left - offset).hypot(overshoot(top, self.height)),
                    SeamAxis::Horizontal => (top - offset).hypot(overshoot(left, self.width)),
                };
                if nearest.is_none_or(|(_, best)| distance < best) {
                    nearest = Some((seam, distance));
                }
            }
        }
        nearest
            .filter(|&(_, distance)| distance <= radius)
            .map(|(seam, _)| seam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds(min: f64, max: f64) -> GapBounds {
        GapBounds::new(min, max).expect("valid test bounds")
    }

    #[test]
    fn reference_wall_solves_to_seven_columns() {
        let solution = solve_axis(144.0, 18.0, bounds(0.25, 3.0));
        assert_eq!(solution.count, 7);
        assert!((solution.gap - 2.25).abs() < 1e-12);
        assert!(solution.exact);
    }

    #[test]
    fn prefers_widest_gap_among_exact_candidates() {
        // 100 = n*18 + (n+1)*g: n=4 -> 5.6, n=5 -> 1.67, not 4 (too wide).
        let solution = solve_axis(100.0, 18.0, bounds(0.25, 3.0));
        assert_eq!(solution.count, 5);
        assert!((solution.gap - 10.0 / 6.0).abs() < 1e-12);
        // Wider upper bound admits n = 4 which has the larger gap.
        let solution = solve_axis(100.0, 18.0, bounds(0.25, 6.0));
        assert_eq!(solution.count, 4);
    }

    #[test]
    fn falls_back_below_max_and_clamps_to_min() {
        // 36: n=1 -> 9 (over), n=2 -> 0 (under). Closest from below is n=2.
        let solution = solve_axis(36.0, 18.0, bounds(0.25, 3.0));
        assert_eq!(solution.count, 2);
        assert!((solution.gap - 0.25).abs() < 1e-12);
        assert!(!solution.exact);
    }

    #[test]
    fn all_gaps_over_max_caps_at_max() {
        // 40: n=1 -> 11, n=2 -> 1.33; bounds [0.1, 1.0] exclude both.
        let solution = solve_axis(40.0, 18.0, bounds(0.1, 1.0));
        assert_eq!(solution.count, 2);
        assert!((solution.gap - 1.0).abs() < 1e-12);
        assert!(!solution.exact);
    }

    #[test]
    fn tiny_length_yields_single_module_without_negative_gap() {
        let solution = solve_axis(10.0, 18.0, bounds(0.25, 3.0));
        assert_eq!(solution.count, 1);
        assert_eq!(solution.gap, 0.0);
        assert!(!solution.exact);
    }

    #[test]
    fn gap_bounds_reject_inverted_and_negative() {
        assert!(GapBounds::new(3.0, 0.25).is_err());
        assert!(GapBounds::new(-0.1, 1.0).is_err());
        assert!(GapBounds::new(f64::NAN, 1.0).is_err());
        assert!(GapBounds::new(0.5, 0.5).is_ok());
    }

    #[test]
    fn fixed_rows_never_overflow_height() {
        let rows = fixed_axis(108.0, 18.0, 0.25);
        assert_eq!(rows.count, 5);
        assert!(rows.extent(18.0) <= 108.0);
        let rows = fixed_axis(20.0, 18.0, 0.25);
        assert_eq!(rows.count, 1);
    }

    #[test]
    fn reference_geometry() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        assert_eq!(geometry.cols, 7);
        assert_eq!(geometry.rows, 5);
        assert!((geometry.col_gap - 2.25).abs() < 1e-12);
        assert_eq!(geometry.row_gap, DEFAULT_ROW_GAP);
        assert!(geometry.exact_columns);
    }

    #[test]
    fn solved_row_policy_uses_joint_bounds() {
        let spec = GridSpec {
            row_gap: RowGapPolicy::Solved,
            ..GridSpec::default()
        };
        let geometry = WallGeometry::solve(144.0, 144.0, &spec, GapBounds::default());
        assert_eq!(geometry.rows, 7);
        assert!((geometry.row_gap - 2.25).abs() < 1e-12);
    }

    #[test]
    fn face_rect_subtracts_internal_gaps() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        let face = geometry.face_rect(&GridRect::new(2, 0, 1, 3));
        assert!((face.width - 18.0).abs() < 1e-12);
        assert!((face.height - (54.0 - 0.5)).abs() < 1e-12);
        assert!((face.x - (2.25 + 2.0 * 20.25)).abs() < 1e-12);
        assert!((face.y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn seam_offsets_cover_boundaries() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        let first = geometry.seam_offset(Seam::vertical(0)).expect("left edge");
        let last = geometry.seam_offset(Seam::vertical(7)).expect("right edge");
        assert!((first - 1.125).abs() < 1e-12);
        assert!((last - (144.0 - 1.125)).abs() < 1e-12);
        assert_eq!(geometry.seam_offset(Seam::vertical(8)), None);
        assert_eq!(geometry.seam_offset(Seam::horizontal(6)), None);
    }

    #[test]
    fn cell_at_snaps_between_seam_centres() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        assert_eq!(geometry.cell_at(0.0, 0.0), Some(RawCell::new(-1, -1)));
        assert_eq!(geometry.cell_at(2.25, 0.25), Some(RawCell::new(0, 0)));
        assert_eq!(geometry.cell_at(50.0, 20.0), Some(RawCell::new(2, 1)));
        assert_eq!(geometry.cell_at(142.0, 107.0), Some(RawCell::new(6, 5)));
        assert_eq!(geometry.cell_at(f64::NAN, 0.0), None);
    }

    #[test]
    fn seam_near_respects_radius_edge() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        // 3 right of vertical seam 1 (21.375), midway between horizontal
        // seams 2 (36.625) and 3 (54.875).
        assert_eq!(geometry.seam_near(24.375, 45.75, 3.0), Some(Seam::vertical(1)));
        assert_eq!(geometry.seam_near(24.375, 45.75, 2.999), None);
        assert_eq!(geometry.seam_near(24.375, 45.75, 22.0), Some(Seam::vertical(1)));
    }

    #[test]
    fn seam_near_prefers_nearest_then_vertical() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        // 2 below horizontal seam 2, 8.75 left of vertical seam 2.
        assert_eq!(geometry.seam_near(32.875, 38.625, 22.0), Some(Seam::horizontal(2)));
        // On the crossing of vertical seam 2 and horizontal seam 2.
        assert_eq!(geometry.seam_near(41.625, 36.625, 22.0), Some(Seam::vertical(2)));
    }

    #[test]
    fn seam_near_measures_past_the_wall_edge() {
        let geometry = WallGeometry::solve(144.0, 108.0, &GridSpec::default(), GapBounds::default());
        // 5 above the top edge on vertical seam 1; horizontal seam 0 is 5.125 away.
        assert_eq!(geometry.seam_near(21.375, -5.0, 5.0), Some(Seam::vertical(1)));
        assert_eq!(geometry.seam_near(21.375, -5.0, 4.9), None);
        assert_eq!(geometry.seam_near(-100.0, -100.0, 22.0), None);
        assert_eq!(geometry.seam_near(f64::NAN, 0.0, 22.0), None);
        assert_eq!(geometry.seam_near(10.0, 10.0, f64::NAN), None);
    }

    proptest! {
        #[test]
        fn exact_solutions_close_the_axis(
            width in 36.0f64..=288.0,
            min in 0.0f64..2.0,
            spread in 0.0f64..6.0,
        ) {
            let bounds = bounds(min, min + spread);
            let solution = solve_axis(width, 18.0, bounds);
            prop_assert!(solution.count >= 1);
            prop_assert!(solution.gap >= 0.0);
            let any_exact = (1..=(width / 18.0).floor() as u16)
                .any(|n| bounds.contains(axis_gap(width, 18.0, n)));
            prop_assert_eq!(solution.exact, any_exact);
            if solution.exact {
                prop_assert!((solution.extent(18.0) - width).abs() < 1e-6);
                prop_assert!(bounds.contains(solution.gap));
            }
        }

        #[test]
        fn solver_is_deterministic(width in 36.0f64..=288.0) {
            let a = solve_axis(width, 18.0, GapBounds::default());
            let b = solve_axis(width, 18.0, GapBounds::default());
            prop_assert_eq!(a, b);
        }
    }
}
