use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use panelwall::{SeamAxis, WallDimensions, WallGeometry, WallLayout};
use serde::Serialize;

use crate::cli::load_config;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct SolveArgs {
    /// Wall width in inches (clamped to the configured range).
    #[arg(long, default_value_t = 144.0)]
    pub width: f64,

    /// Wall height in inches (clamped to the configured range).
    #[arg(long, default_value_t = 108.0)]
    pub height: f64,

    /// Module size override.
    #[arg(long)]
    pub cell: Option<f64>,

    #[arg(long)]
    pub joint_min: Option<f64>,

    #[arg(long)]
    pub joint_max: Option<f64>,

    /// Editor config (.toml or .json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit one JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    dimensions: WallDimensions,
    geometry: WallGeometry,
    blocks: usize,
    vertical_seams: Vec<f64>,
    horizontal_seams: Vec<f64>,
}

pub fn run_solve(args: SolveArgs, out: &mut dyn Write) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    config.wall.default_width = args.width;
    config.wall.default_height = args.height;
    if let Some(cell) = args.cell {
        config.grid.cell = cell;
    }
    if let Some(min) = args.joint_min {
        config.grid.joint_min = min;
    }
    if let Some(max) = args.joint_max {
        config.grid.joint_max = max;
    }
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(CliError::invalid(errors.join("; ")));
    }

    let wall = WallLayout::new(config.to_layout_config()?)?;
    let geometry = *wall.geometry();
    let report = SolveReport {
        dimensions: wall.dimensions(),
        geometry,
        blocks: wall.store().len(),
        vertical_seams: seam_offsets(&geometry, SeamAxis::Vertical),
        horizontal_seams: seam_offsets(&geometry, SeamAxis::Horizontal),
    };
    tracing::info!(
        cols = geometry.cols,
        rows = geometry.rows,
        exact = geometry.exact_columns,
        "solved wall"
    );

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "wall {} x {} in",
        report.dimensions.width, report.dimensions.height
    )?;
    writeln!(
        out,
        "columns {} gap {:.4}{}",
        geometry.cols,
        geometry.col_gap,
        if geometry.exact_columns { "" } else { " (clamped)" }
    )?;
    writeln!(out, "rows {} gap {:.4}", geometry.rows, geometry.row_gap)?;
    writeln!(out, "auto-filled blocks {}", report.blocks)?;
    Ok(())
}

fn seam_offsets(geometry: &WallGeometry, axis: SeamAxis) -> Vec<f64> {
    (0..geometry.seam_count(axis))
        .filter_map(|index| geometry.seam_offset(panelwall::Seam::new(axis, index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SolveArgs {
        SolveArgs {
            width: 144.0,
            height: 108.0,
            cell: None,
            joint_min: None,
            joint_max: None,
            config: None,
            json: false,
        }
    }

    #[test]
    fn reference_wall_in_text() {
        let mut out = Vec::new();
        run_solve(args(), &mut out).expect("solve");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("columns 7 gap 2.2500"), "{text}");
        assert!(text.contains("rows 5 gap 0.2500"), "{text}");
    }

    #[test]
    fn json_report_lists_seams() {
        let mut out = Vec::new();
        run_solve(
            SolveArgs {
                json: true,
                ..args()
            },
            &mut out,
        )
        .expect("solve");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["geometry"]["cols"], 7);
        assert_eq!(value["vertical_seams"].as_array().map(Vec::len), Some(8));
    }

    #[test]
    fn inverted_joint_bounds_are_bad_input() {
        let err = run_solve(
            SolveArgs {
                joint_min: Some(4.0),
                ..args()
            },
            &mut Vec::new(),
        )
        .expect_err("invalid");
        assert_eq!(err.exit_code(), 2);
    }
}
