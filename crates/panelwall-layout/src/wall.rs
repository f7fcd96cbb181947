//! The wall aggregate: dimensions, derived geometry and the block store.

use panelwall_core::GridRect;
use serde::{Deserialize, Serialize};

use crate::block::{LayoutModelError, LockedJoints, SpanLimits};
use crate::document::{LAYOUT_DOCUMENT_SCHEMA_VERSION, LayoutDocument};
use crate::grid::{GapBounds, GridSpec, WallGeometry};
use crate::store::{LayoutStore, Placement};

/// Inclusive clamp range for wall width and height (inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallLimits {
    pub min: f64,
    pub max: f64,
}

impl WallLimits {
    /// Clamp `value` into range. Non-finite input clamps to `min`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }
}

impl Default for WallLimits {
    fn default() -> Self {
        Self {
            min: 36.0,
            max: 288.0,
        }
    }
}

/// Wall width and height (inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallDimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for WallDimensions {
    fn default() -> Self {
        Self {
            width: 144.0,
            height: 108.0,
        }
    }
}

/// Static parameters of a wall layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub limits: WallLimits,
    pub initial: WallDimensions,
    pub grid: GridSpec,
    pub joints: GapBounds,
    pub spans: SpanLimits,
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutModelError> {
        self.grid.validate()?;
        GapBounds::new(self.joints.min(), self.joints.max())?;
        SpanLimits::new(self.spans.max_width, self.spans.max_height)?;
        if !self.limits.is_valid() {
            return Err(LayoutModelError::InvalidWallLimits {
                min: self.limits.min,
                max: self.limits.max,
            });
        }
        Ok(())
    }
}

/// What a dimension or joint-bound change did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallChange {
    pub dimensions: WallDimensions,
    pub geometry: WallGeometry,
    /// Whether the block layout was discarded and auto-filled again.
    pub regenerated: bool,
}

/// Dimensions, geometry and blocks of one wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallLayout {
    config: LayoutConfig,
    dimensions: WallDimensions,
    geometry: WallGeometry,
    store: LayoutStore,
}

impl WallLayout {
    /// A wall at the configured initial size, auto-filled.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutModelError> {
        config.validate()?;
        let dimensions = WallDimensions {
            width: config.limits.clamp(config.initial.width),
            height: config.limits.clamp(config.initial.height),
        };
        let geometry = WallGeometry::solve(
            dimensions.width,
            dimensions.height,
            &config.grid,
            config.joints,
        );
        let mut store = LayoutStore::new(geometry.cols, geometry.rows, config.spans);
        store.regenerate(geometry.cols, geometry.rows)?;
        Ok(Self {
            config,
            dimensions,
            geometry,
            store,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub const fn dimensions(&self) -> WallDimensions {
        self.dimensions
    }

    #[must_use]
    pub const fn geometry(&self) -> &WallGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn joints(&self) -> GapBounds {
        self.config.joints
    }

    #[must_use]
    pub const fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LayoutStore {
        &mut self.store
    }

    /// Resize the wall. Omitted axes keep their value; given axes are clamped.
    ///
    /// Always regenerates the block layout.
    pub fn set_dimensions(
        &mut self,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<WallChange, LayoutModelError> {
        let dimensions = WallDimensions {
            width: width.map_or(self.dimensions.width, |w| self.config.limits.clamp(w)),
            height: height.map_or(self.dimensions.height, |h| self.config.limits.clamp(h)),
        };
        let geometry = WallGeometry::solve(
            dimensions.width,
            dimensions.height,
            &self.config.grid,
            self.config.joints,
        );
        self.store.regenerate(geometry.cols, geometry.rows)?;
        self.dimensions = dimensions;
        self.geometry = geometry;
        tracing::debug!(
            target: "panelwall.layout",
            width = dimensions.width,
            height = dimensions.height,
            cols = geometry.cols,
            rows = geometry.rows,
            col_gap = geometry.col_gap,
            exact = geometry.exact_columns,
            "wall resized"
        );
        Ok(WallChange {
            dimensions,
            geometry,
            regenerated: true,
        })
    }

    /// Change the joint bounds and re-solve the geometry.
    ///
    /// Blocks survive when the column and row counts are unchanged; otherwise
    /// the layout is regenerated.
    pub fn set_joint_bounds(&mut self, min: f64, max: f64) -> Result<WallChange, LayoutModelError> {
        let joints = GapBounds::new(min, max)?;
        let geometry = WallGeometry::solve(
            self.dimensions.width,
            self.dimensions.height,
            &self.config.grid,
            joints,
        );
        let regenerated = geometry.cols != self.geometry.cols || geometry.rows != self.geometry.rows;
        if regenerated {
            self.store.regenerate(geometry.cols, geometry.rows)?;
        }
        self.config.joints = joints;
        self.geometry = geometry;
        tracing::debug!(
            target: "panelwall.layout",
            joint_min = min,
            joint_max = max,
            col_gap = geometry.col_gap,
            regenerated,
            "joint bounds changed"
        );
        Ok(WallChange {
            dimensions: self.dimensions,
            geometry,
            regenerated,
        })
    }

    /// Destructively place a block.
    pub fn place(
        &mut self,
        rect: GridRect,
        locked_joints: LockedJoints,
    ) -> Result<Placement, LayoutModelError> {
        self.store.place(rect, locked_joints)
    }

    /// Snapshot the wall as a persistable document.
    #[must_use]
    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument {
            schema_version: LAYOUT_DOCUMENT_SCHEMA_VERSION,
            wall_width: self.dimensions.width,
            wall_height: self.dimensions.height,
            joint_min: self.config.joints.min(),
            joint_max: self.config.joints.max(),
            blocks: self.store.blocks().to_vec(),
        }
    }

    /// Rebuild a wall from a document, re-deriving geometry.
    ///
    /// Rejects unknown schema versions, invalid joint bounds and blocks that
    /// break any store invariant on the derived grid.
    pub fn from_document(
        document: &LayoutDocument,
        mut config: LayoutConfig,
    ) -> Result<Self, LayoutModelError> {
        document.validate_schema()?;
        config.joints = GapBounds::new(document.joint_min, document.joint_max)?;
        config.validate()?;
        let dimensions = WallDimensions {
            width: config.limits.clamp(document.wall_width),
            height: config.limits.clamp(document.wall_height),
        };
        let geometry = WallGeometry::solve(
            dimensions.width,
            dimensions.height,
            &config.grid,
            config.joints,
        );
        let store = LayoutStore::from_blocks(
            geometry.cols,
            geometry.rows,
            config.spans,
            document.blocks.clone(),
        )?;
        Ok(Self {
            config,
            dimensions,
            geometry,
            store,
        })
    }
}
