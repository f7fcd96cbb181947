use std::fmt;

use panelwall_layout::LayoutModelError;
#[cfg(feature = "runtime")]
use panelwall_runtime::{ConfigError, PersistenceError, ScriptError};

/// Top-level error type for panelwall hosts.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The layout model rejected an operation or document.
    Model(LayoutModelError),
    #[cfg(feature = "runtime")]
    Config(ConfigError),
    #[cfg(feature = "runtime")]
    Persistence(PersistenceError),
    #[cfg(feature = "runtime")]
    Script(ScriptError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Model(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Persistence(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Script(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Model(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Config(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Persistence(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Script(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<LayoutModelError> for Error {
    fn from(err: LayoutModelError) -> Self {
        Self::Model(err)
    }
}

#[cfg(feature = "runtime")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "runtime")]
impl From<PersistenceError> for Error {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

#[cfg(feature = "runtime")]
impl From<ScriptError> for Error {
    fn from(err: ScriptError) -> Self {
        Self::Script(err)
    }
}

/// Standard result type for panelwall APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn model_errors_convert_and_chain() {
        let err: Error = LayoutModelError::ZeroBlockId.into();
        assert!(matches!(err, Error::Model(LayoutModelError::ZeroBlockId)));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), LayoutModelError::ZeroBlockId.to_string());
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = std::io::Error::other("disk").into();
        assert_eq!(err.to_string(), "disk");
    }
}
