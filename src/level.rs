//! Severity levels and their mapping onto `tracing`.
//!
//! `tracing` stops at ERROR, so `fatal` is carried as an ERROR event emitted
//! under the [`FATAL_TARGET`] target. Everything that needs to know the
//! effective level of an event goes through [`LogLevel::of_metadata`] so the
//! target is honoured in one place.

use crate::error::LogError;
use std::fmt;
use std::str::FromStr;
use tracing::{Level, Metadata};

/// Target of every event emitted at [`LogLevel::Fatal`].
///
/// Use it to emit fatal records with structured fields:
/// `tracing::error!(target: FATAL_TARGET, code = 1, "giving up")`.
pub const FATAL_TARGET: &str = "probot::fatal";

/// Ordered severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Every level, lowest first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Lower-case name, as accepted in `LOG_LEVEL`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Upper-case label used by the pretty renderer.
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Numeric severity written to structured records (10 for trace up to 60 for fatal).
    pub fn severity(self) -> u8 {
        match self {
            LogLevel::Trace => 10,
            LogLevel::Debug => 20,
            LogLevel::Info => 30,
            LogLevel::Warn => 40,
            LogLevel::Error => 50,
            LogLevel::Fatal => 60,
        }
    }

    /// The `tracing` level events of this severity are emitted at.
    pub fn tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error | LogLevel::Fatal => Level::ERROR,
        }
    }

    /// Classify a callsite, treating ERROR callsites under [`FATAL_TARGET`] as fatal.
    pub fn of_metadata(meta: &Metadata<'_>) -> LogLevel {
        let level = *meta.level();
        if level == Level::TRACE {
            LogLevel::Trace
        } else if level == Level::DEBUG {
            LogLevel::Debug
        } else if level == Level::INFO {
            LogLevel::Info
        } else if level == Level::WARN {
            LogLevel::Warn
        } else if meta.target() == FATAL_TARGET {
            LogLevel::Fatal
        } else {
            LogLevel::Error
        }
    }

    /// Whether a callsite passes a threshold of `self`.
    pub fn admits(self, meta: &Metadata<'_>) -> bool {
        LogLevel::of_metadata(meta) >= self
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LogError::InvalidLevel(s.to_string()))
    }
}
