//! Environment-driven logger configuration.
//!
//! Two variables decide everything: `NODE_ENV` picks between pretty and
//! structured output, `LOG_LEVEL` picks the threshold. The rules live in
//! [`LogConfig::from_lookup`] so they can be exercised against a plain map
//! instead of the process environment.

use crate::error::LogError;
use crate::level::LogLevel;
use std::collections::BTreeSet;
use std::env::VarError;

/// Name tag attached to every record.
pub const APP_NAME: &str = "probot";

/// Deployment-mode variable.
pub const MODE_VAR: &str = "NODE_ENV";
/// Threshold variable.
pub const LEVEL_VAR: &str = "LOG_LEVEL";
/// Set to `true` or `1` to write level labels instead of severities in JSON.
pub const LEVEL_IN_STRING_VAR: &str = "LOG_LEVEL_IN_STRING";

/// Fields hidden from pretty output by default: timestamp, process id and host
/// from the record itself, plus the HTTP request/response instrumentation keys.
pub const DEFAULT_IGNORED_FIELDS: [&str; 6] =
    ["time", "pid", "hostname", "req", "res", "responseTime"];

/// Runtime context that selects the output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// Pretty, field-filtered output.
    Development,
    /// Line-delimited JSON.
    Production,
}

impl DeploymentMode {
    /// Unset, empty and `"development"` mean development; anything else is production.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") | Some("development") => DeploymentMode::Development,
            Some(_) => DeploymentMode::Production,
        }
    }
}

/// Rendering instructions for development output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Field names left out of rendered records.
    pub ignore: BTreeSet<String>,
}

impl PrettyOptions {
    /// Whether `key` is hidden from pretty output.
    pub fn ignores(&self, key: &str) -> bool {
        self.ignore.contains(key)
    }
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORED_FIELDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Everything needed to build a [`Logger`](crate::Logger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Lowest severity that is written.
    pub level: LogLevel,
    /// Name tag written with every record, always [`APP_NAME`].
    pub name: String,
    /// Present only in development mode.
    pub pretty: Option<PrettyOptions>,
    /// Write the level label instead of its numeric severity in structured records.
    pub level_in_string: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::for_mode(DeploymentMode::Development, LogLevel::default())
    }
}

impl LogConfig {
    /// Configuration for `mode` at `level`: pretty options only in development.
    pub fn for_mode(mode: DeploymentMode, level: LogLevel) -> Self {
        Self {
            level,
            name: APP_NAME.to_string(),
            pretty: match mode {
                DeploymentMode::Development => Some(PrettyOptions::default()),
                DeploymentMode::Production => None,
            },
            level_in_string: false,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, LogError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Resolve the configuration from a lookup shaped like [`std::env::var`].
    ///
    /// Empty values are treated as unset. A value that is set but not valid
    /// UTF-8 still counts as set: `NODE_ENV` becomes production, and the
    /// level and flag variables are rejected. An unrecognised `LOG_LEVEL` is
    /// an error rather than a silent fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LogError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let read = |key: &str| match lookup(key) {
            Ok(v) if v.is_empty() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(raw)) => Err(raw.to_string_lossy().into_owned()),
        };

        let mode = match read(MODE_VAR) {
            Ok(value) => DeploymentMode::from_value(value.as_deref()),
            Err(_) => DeploymentMode::Production,
        };
        let level = match read(LEVEL_VAR) {
            Ok(Some(raw)) => raw.parse()?,
            Ok(None) => LogLevel::default(),
            Err(lossy) => return Err(LogError::InvalidLevel(lossy)),
        };
        let level_in_string = match read(LEVEL_IN_STRING_VAR) {
            Ok(Some(raw)) => parse_flag(LEVEL_IN_STRING_VAR, &raw)?,
            Ok(None) => false,
            Err(lossy) => {
                return Err(LogError::InvalidFlag {
                    var: LEVEL_IN_STRING_VAR,
                    value: lossy,
                });
            }
        };

        Ok(Self {
            level_in_string,
            ..Self::for_mode(mode, level)
        })
    }

    /// Deployment mode implied by the presence of pretty options.
    pub fn mode(&self) -> DeploymentMode {
        if self.pretty.is_some() {
            DeploymentMode::Development
        } else {
            DeploymentMode::Production
        }
    }

    /// Whether records are rendered for humans rather than as JSON.
    pub fn is_pretty(&self) -> bool {
        self.pretty.is_some()
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, LogError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(LogError::InvalidFlag {
            var,
            value: raw.to_string(),
        }),
    }
}
