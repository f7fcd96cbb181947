use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use panelwall::EditorConfig;

use crate::error::{CliError, Result};
use crate::inspect::{InspectArgs, run_inspect};
use crate::logging::{self, LogFormat};
use crate::replay::{ReplayArgs, run_replay};
use crate::solve::{SolveArgs, run_solve};

#[derive(Debug, Parser)]
#[command(
    name = "panelwall",
    about = "Solve, replay and inspect panel wall layouts",
    version
)]
pub struct Cli {
    /// Log output format (filter via PANELWALL_LOG).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Solve the column/row grid for a wall size.
    Solve(SolveArgs),

    /// Replay an editor script and report every effect.
    Replay(ReplayArgs),

    /// Validate a saved layout document and describe it.
    Inspect(InspectArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Solve(args) => run_solve(args, out),
        Commands::Replay(args) => run_replay(args, out),
        Commands::Inspect(args) => run_inspect(args, out),
    }
}

pub(crate) fn require_path(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

/// Load `path` if given, otherwise defaults. Validation problems are bad input.
pub(crate) fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    require_path(path)?;
    match EditorConfig::load(path) {
        Ok(config) => Ok(config),
        Err(panelwall::runtime::ConfigError::Validation(errors)) => {
            Err(CliError::invalid(errors.join("; ")))
        }
        Err(err) => Err(err.into()),
    }
}
