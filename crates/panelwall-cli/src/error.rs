use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Panelwall(#[from] panelwall::Error),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingPath { .. } | Self::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<panelwall::LayoutModelError> for CliError {
    fn from(err: panelwall::LayoutModelError) -> Self {
        Self::Panelwall(err.into())
    }
}

impl From<panelwall::runtime::ConfigError> for CliError {
    fn from(err: panelwall::runtime::ConfigError) -> Self {
        Self::Panelwall(err.into())
    }
}

impl From<panelwall::runtime::ScriptError> for CliError {
    fn from(err: panelwall::runtime::ScriptError) -> Self {
        Self::Panelwall(err.into())
    }
}

impl From<panelwall::runtime::PersistenceError> for CliError {
    fn from(err: panelwall::runtime::PersistenceError) -> Self {
        Self::Panelwall(err.into())
    }
}
