use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use panelwall::runtime::load_editor;
use panelwall::{BlockId, FaceRect, GridRect, Seam, WallGeometry};
use serde::Serialize;

use crate::cli::{load_config, require_path};
use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Saved layout document (JSON).
    pub document: PathBuf,

    /// Editor config (.toml or .json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit one JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct BlockReport {
    id: BlockId,
    rect: GridRect,
    face: FaceRect,
    locked: bool,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    geometry: WallGeometry,
    covered_cells: u32,
    total_cells: u32,
    blocks: Vec<BlockReport>,
    locked_seams: Vec<Seam>,
}

pub fn run_inspect(args: InspectArgs, out: &mut dyn Write) -> Result<()> {
    require_path(&args.document)?;
    let config = load_config(args.config.as_ref())?;
    let editor = load_editor(
        &args.document,
        config.to_layout_config()?,
        config.drag_policy(),
    )?;

    let geometry = *editor.geometry();
    let store = editor.store();
    let report = InspectReport {
        geometry,
        covered_cells: store.covered_area(),
        total_cells: u32::from(geometry.cols) * u32::from(geometry.rows),
        blocks: store
            .blocks()
            .iter()
            .map(|block| BlockReport {
                id: block.id,
                rect: block.rect(),
                face: geometry.face_rect(&block.rect()),
                locked: block.is_locked(),
            })
            .collect(),
        locked_seams: editor.seam_registry().iter().collect(),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "grid {} x {} (column gap {:.4}, row gap {:.4})",
        geometry.cols, geometry.rows, geometry.col_gap, geometry.row_gap
    )?;
    writeln!(
        out,
        "coverage {}/{} cells in {} blocks",
        report.covered_cells,
        report.total_cells,
        report.blocks.len()
    )?;
    for block in &report.blocks {
        writeln!(
            out,
            "{} at ({}, {}) span {}x{} face {:.2}x{:.2}{}",
            block.id,
            block.rect.col,
            block.rect.row,
            block.rect.w,
            block.rect.h,
            block.face.width,
            block.face.height,
            if block.locked { " locked" } else { "" }
        )?;
    }
    Ok(())
}
