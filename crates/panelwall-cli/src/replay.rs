use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use panelwall::WallEditor;
use panelwall::runtime::{EditorScript, load_editor, save_document};

use crate::cli::{load_config, require_path};
use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Script file (JSON).
    pub script: PathBuf,

    /// Editor config (.toml or .json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start from this saved document instead of an auto-filled wall.
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Save the final document here.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Emit one JSON line per effect instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run_replay(args: ReplayArgs, out: &mut dyn Write) -> Result<()> {
    require_path(&args.script)?;
    let config = load_config(args.config.as_ref())?;
    let script = EditorScript::from_json_file(&args.script)?;

    let outcome = if let Some(document) = &args.document {
        require_path(document)?;
        let mut editor = load_editor(document, config.to_layout_config()?, config.drag_policy())?;
        script.run_on(&mut editor)
    } else {
        let mut editor = WallEditor::new(config.to_layout_config()?, config.drag_policy())?;
        script.run_on(&mut editor)
    };
    tracing::info!(
        steps = script.steps.len(),
        effects = outcome.entries.len(),
        blocks = outcome.document.blocks.len(),
        "replayed script"
    );

    for entry in &outcome.entries {
        if args.json {
            serde_json::to_writer(&mut *out, entry)?;
            writeln!(out)?;
        } else {
            writeln!(out, "step {:>3}: {}", entry.step, entry.effect.name())?;
        }
    }
    if !args.json {
        writeln!(out, "final blocks {}", outcome.document.blocks.len())?;
    }

    if let Some(path) = &args.output {
        save_document(path, &outcome.document)?;
    }
    Ok(())
}
