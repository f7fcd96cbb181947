#![forbid(unsafe_code)]

//! Screen-to-grid projection.
//!
//! The editor never knows how a pointer maps onto the wall: a host injects a
//! [`GridProjector`]. Two ready-made projectors are provided:
//!
//! - [`OrthoProjector`] for a front-on view where the wall's top-left corner
//!   sits at a known pixel and the scale is uniform;
//! - [`WallPlaneProjector`] for hosts that already resolve a pointer to a
//!   point on the wall plane (e.g. by ray casting in a 3-D scene), expressed in
//!   wall-local coordinates with the origin at the wall centre and +y up.
//!
//! Any `Fn(PointerPosition, &WallGeometry) -> Option<RawCell>` closure is a
//! projector too. Closures cannot [`locate`](GridProjector::locate) points on
//! the wall plane, so they never drive seam hover.

use panelwall_core::{PointerPosition, RawCell};
use panelwall_layout::WallGeometry;
use serde::{Deserialize, Serialize};

/// Maps a screen position to a (possibly off-wall) grid cell.
///
/// `None` means the pointer does not hit the wall plane at all.
pub trait GridProjector {
    fn project(&self, position: PointerPosition, geometry: &WallGeometry) -> Option<RawCell>;

    /// Where the pointer meets the wall plane, for seam picking.
    fn locate(&self, position: PointerPosition, geometry: &WallGeometry) -> PlaneHit {
        let _ = (position, geometry);
        PlaneHit::Unsupported
    }
}

/// A pointer located on the wall plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneHit {
    /// The projector cannot resolve wall-plane points.
    Unsupported,
    /// The pointer misses the wall plane.
    Miss,
    /// Offsets from the wall's top-left corner in wall units, and the screen
    /// scale there.
    At {
        left: f64,
        top: f64,
        pixels_per_unit: f64,
    },
}

impl<F> GridProjector for F
where
    F: Fn(PointerPosition, &WallGeometry) -> Option<RawCell>,
{
    fn project(&self, position: PointerPosition, geometry: &WallGeometry) -> Option<RawCell> {
        self(position, geometry)
    }
}

/// Front-on orthographic view of the wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthoProjector {
    /// Screen position of the wall's top-left corner.
    pub origin: PointerPosition,
    /// Screen pixels per wall unit (inch).
    pub pixels_per_unit: f64,
}

impl OrthoProjector {
    #[must_use]
    pub const fn new(origin: PointerPosition, pixels_per_unit: f64) -> Self {
        Self {
            origin,
            pixels_per_unit,
        }
    }

    /// Screen position at the top-left of `cell`'s face, handy for scripted
    /// input.
    #[must_use]
    pub fn cell_origin(&self, col: u16, row: u16, geometry: &WallGeometry) -> PointerPosition {
        let left = geometry.col_gap + f64::from(col) * (geometry.cell + geometry.col_gap);
        let top = geometry.row_gap + f64::from(row) * (geometry.cell + geometry.row_gap);
        PointerPosition::new(
            self.origin.x + left * self.pixels_per_unit,
            self.origin.y + top * self.pixels_per_unit,
        )
    }
}

impl Default for OrthoProjector {
    fn default() -> Self {
        Self {
            origin: PointerPosition::default(),
            pixels_per_unit: 1.0,
        }
    }
}

impl GridProjector for OrthoProjector {
    fn project(&self, position: PointerPosition, geometry: &WallGeometry) -> Option<RawCell> {
        match self.locate(position, geometry) {
            PlaneHit::At { left, top, .. } => geometry.cell_at(left, top),
            PlaneHit::Unsupported | PlaneHit::Miss => None,
        }
    }

    fn locate(&self, position: PointerPosition, _geometry: &WallGeometry) -> PlaneHit {
        if !self.pixels_per_unit.is_finite() || self.pixels_per_unit <= 0.0 {
            return PlaneHit::Miss;
        }
        PlaneHit::At {
            left: (position.x - self.origin.x) / self.pixels_per_unit,
            top: (position.y - self.origin.y) / self.pixels_per_unit,
            pixels_per_unit: self.pixels_per_unit,
        }
    }
}

/// A point on the wall plane, origin at the wall centre, +y up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WallPoint {
    pub x: f64,
    pub y: f64,
}

impl WallPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert to top-left-origin, +y down coordinates.
    #[must_use]
    pub fn to_top_left(self, geometry: &WallGeometry) -> (f64, f64) {
        (self.x + geometry.width / 2.0, geometry.height / 2.0 - self.y)
    }
}

/// Projector backed by a host hit test onto the wall plane.
///
/// Seam picking needs the screen scale at the wall; set it with
/// [`with_pixel_scale`](Self::with_pixel_scale).
pub struct WallPlaneProjector<F> {
    hit: F,
    pixels_per_unit: Option<f64>,
}

impl<F> WallPlaneProjector<F>
where
    F: Fn(PointerPosition) -> Option<WallPoint>,
{
    pub const fn new(hit: F) -> Self {
        Self {
            hit,
            pixels_per_unit: None,
        }
    }

    #[must_use]
    pub fn with_pixel_scale(mut self, pixels_per_unit: f64) -> Self {
        self.pixels_per_unit = Some(pixels_per_unit);
        self
    }
}

impl<F> GridProjector for WallPlaneProjector<F>
where
    F: Fn(PointerPosition) -> Option<WallPoint>,
{
    fn project(&self, position: PointerPosition, geometry: &WallGeometry) -> Option<RawCell> {
        let point = (self.hit)(position)?;
        let (left, top) = point.to_top_left(geometry);
        geometry.cell_at(left, top)
    }

    fn locate(&self, position: PointerPosition, geometry: &WallGeometry) -> PlaneHit {
        let Some(pixels_per_unit) = self.pixels_per_unit else {
            return PlaneHit::Unsupported;
        };
        match (self.hit)(position) {
            Some(point) => {
                let (left, top) = point.to_top_left(geometry);
                PlaneHit::At {
                    left,
                    top,
                    pixels_per_unit,
                }
            }
            None => PlaneHit::Miss,
        }
    }
}
