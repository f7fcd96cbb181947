#![forbid(unsafe_code)]

//! Editor configuration as data.
//!
//! Every tunable of the wall editor lives in one [`EditorConfig`] that can be
//! loaded from TOML (with the `policy-config` feature) or JSON. All fields
//! carry defaults, so a partial file only overrides what it names:
//!
//! ```toml
//! [wall]
//! default_width = 200.0
//!
//! [grid]
//! joint_max = 6.0
//! row_gap = { policy = "solved" }
//!
//! [drag]
//! overlap_policy = "avoid_locked"
//! ```

use std::path::Path;

use panelwall_layout::{
    DEFAULT_CELL, DEFAULT_JOINT_MAX, DEFAULT_JOINT_MIN, GapBounds, GridSpec, LayoutConfig,
    LayoutModelError, RowGapPolicy, SpanLimits, WallDimensions, WallLimits,
};
use serde::{Deserialize, Serialize};

use crate::drag::DragPolicy;

/// Top-level editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub wall: WallSection,
    pub grid: GridSection,
    pub spans: SpanLimits,
    pub drag: DragPolicy,
}

/// `[wall]`: clamp range and starting size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSection {
    pub min_size: f64,
    pub max_size: f64,
    pub default_width: f64,
    pub default_height: f64,
}

impl Default for WallSection {
    fn default() -> Self {
        let limits = WallLimits::default();
        let initial = WallDimensions::default();
        Self {
            min_size: limits.min,
            max_size: limits.max,
            default_width: initial.width,
            default_height: initial.height,
        }
    }
}

/// `[grid]`: module size, joint bounds and row reveal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSection {
    pub cell: f64,
    pub joint_min: f64,
    pub joint_max: f64,
    pub row_gap: RowGapPolicy,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            cell: DEFAULT_CELL,
            joint_min: DEFAULT_JOINT_MIN,
            joint_max: DEFAULT_JOINT_MAX,
            row_gap: RowGapPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load by file extension (`.toml` or anything else as JSON) and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::load_toml(path)?
        } else {
            Self::from_json_file(path)?
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    #[cfg(feature = "policy-config")]
    fn load_toml(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    #[cfg(not(feature = "policy-config"))]
    fn load_toml(_path: &Path) -> Result<Self, ConfigError> {
        Err(ConfigError::Validation(vec![
            "TOML configs need the `policy-config` feature".into(),
        ]))
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let wall = &self.wall;

        if !wall.min_size.is_finite() || wall.min_size <= 0.0 {
            errors.push(format!("wall.min_size must be > 0, got {}", wall.min_size));
        }
        if !wall.max_size.is_finite() || wall.max_size < wall.min_size {
            errors.push(format!(
                "wall.max_size must be >= wall.min_size, got {} < {}",
                wall.max_size, wall.min_size
            ));
        }
        for (name, value) in [
            ("wall.default_width", wall.default_width),
            ("wall.default_height", wall.default_height),
        ] {
            if !value.is_finite() {
                errors.push(format!("{name} must be finite, got {value}"));
            }
        }

        let grid = &self.grid;
        if !grid.cell.is_finite() || grid.cell <= 0.0 {
            errors.push(format!("grid.cell must be > 0, got {}", grid.cell));
        }
        if !grid.joint_min.is_finite() || grid.joint_min < 0.0 {
            errors.push(format!("grid.joint_min must be >= 0, got {}", grid.joint_min));
        }
        if !grid.joint_max.is_finite() || grid.joint_max < grid.joint_min {
            errors.push(format!(
                "grid.joint_max must be >= grid.joint_min, got {} < {}",
                grid.joint_max, grid.joint_min
            ));
        }
        if let RowGapPolicy::Fixed { gap } = grid.row_gap
            && (!gap.is_finite() || gap < 0.0)
        {
            errors.push(format!("grid.row_gap.gap must be >= 0, got {gap}"));
        }

        if self.spans.max_width == 0 {
            errors.push("spans.max_width must be > 0".into());
        }
        if self.spans.max_height == 0 {
            errors.push("spans.max_height must be > 0".into());
        }

        errors
    }

    /// Build the layout parameters.
    pub fn to_layout_config(&self) -> Result<LayoutConfig, LayoutModelError> {
        let config = LayoutConfig {
            limits: WallLimits {
                min: self.wall.min_size,
                max: self.wall.max_size,
            },
            initial: WallDimensions {
                width: self.wall.default_width,
                height: self.wall.default_height,
            },
            grid: GridSpec {
                cell: self.grid.cell,
                row_gap: self.grid.row_gap,
            },
            joints: GapBounds::new(self.grid.joint_min, self.grid.joint_max)?,
            spans: SpanLimits::new(self.spans.max_width, self.spans.max_height)?,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub const fn drag_policy(&self) -> DragPolicy {
        self.drag
    }
}

/// Errors that can occur when loading an editor configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::OverlapPolicy;

    #[test]
    fn default_config_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_empty());
        let layout = config.to_layout_config().expect("layout config");
        assert_eq!(layout, LayoutConfig::default());
        assert_eq!(config.drag_policy(), DragPolicy::default());
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = EditorConfig::from_toml_str(
            r#"
            [wall]
            default_width = 200.0

            [grid]
            joint_max = 6.0
            row_gap = { policy = "solved" }

            [drag]
            overlap_policy = "avoid_locked"
            "#,
        )
        .expect("parse");
        assert_eq!(config.wall.default_width, 200.0);
        assert_eq!(config.wall.default_height, 108.0);
        assert_eq!(config.grid.joint_max, 6.0);
        assert_eq!(config.grid.joint_min, DEFAULT_JOINT_MIN);
        assert_eq!(config.grid.row_gap, RowGapPolicy::Solved);
        assert_eq!(config.drag.overlap_policy, OverlapPolicy::AvoidLocked);
        assert!(config.drag.cancel_on_focus_loss);
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EditorConfig::from_toml_str("[grid]\ncell = \"big\"").expect_err("bad type");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn json_round_trips() {
        let mut config = EditorConfig::default();
        config.spans.max_height = 3;
        config.grid.row_gap = RowGapPolicy::Fixed { gap: 0.5 };
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(EditorConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn validate_collects_every_problem() {
        let mut config = EditorConfig::default();
        config.wall.min_size = 0.0;
        config.grid.joint_min = 4.0;
        config.spans.max_width = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.starts_with("wall.min_size")));
        assert!(errors.iter().any(|e| e.starts_with("grid.joint_max")));
        assert!(errors.iter().any(|e| e.starts_with("spans.max_width")));
        assert!(config.to_layout_config().is_err());
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("editor.json");
        std::fs::write(&json_path, r#"{"spans":{"max_width":2}}"#).expect("write");
        let config = EditorConfig::load(&json_path).expect("load json");
        assert_eq!(config.spans.max_width, 2);
        assert_eq!(config.spans.max_height, 5);

        let bad_path = dir.path().join("bad.json");
        std::fs::write(&bad_path, r#"{"grid":{"cell":-1.0}}"#).expect("write");
        assert!(matches!(
            EditorConfig::load(&bad_path),
            Err(ConfigError::Validation(_))
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(EditorConfig::load(missing), Err(ConfigError::Io(_))));
    }

    #[test]
    fn error_display_and_source() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
        assert!(std::error::Error::source(&err).is_none());
    }
}
