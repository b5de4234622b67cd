//! Error type shared by configuration parsing and logger installation.

use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;

/// Failures while resolving configuration or installing a logger.
#[derive(Debug, Error)]
pub enum LogError {
    /// A level name outside trace, debug, info, warn, error, fatal.
    #[error("invalid log level {0:?} (expected trace, debug, info, warn, error or fatal)")]
    InvalidLevel(String),

    /// A boolean environment variable that is neither true/1 nor false/0.
    #[error("invalid value {value:?} for {var} (expected true, false, 1 or 0)")]
    InvalidFlag { var: &'static str, value: String },

    /// [`Logger::install`](crate::Logger::install) found a global default already set.
    #[error("a global logger is already installed")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}
