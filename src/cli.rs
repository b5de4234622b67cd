//! CLI argument processing and conversion utilities.
//!
//! Keeps the flag precedence rules out of `main()` so they can be tested
//! without parsing a command line.

use probot_log::{LogConfig, LogLevel};
use std::fmt::Write as _;

/// Map the verbosity flags onto a level that overrides `LOG_LEVEL`.
///
/// Precedence:
/// 1. `quiet` forces WARN+.
/// 2. `-vv` (or more) => TRACE.
/// 3. `-v`  => DEBUG.
/// 4. Else `None`, leaving the environment in charge.
pub fn level_override(quiet: bool, verbose: u8) -> Option<LogLevel> {
    if quiet {
        Some(LogLevel::Warn)
    } else if verbose > 1 {
        Some(LogLevel::Trace)
    } else if verbose == 1 {
        Some(LogLevel::Debug)
    } else {
        None
    }
}

/// Human-readable summary for `--show-config`.
pub fn describe_config(config: &LogConfig) -> String {
    let mut out = String::new();
    let mode = if config.is_pretty() {
        "development"
    } else {
        "production"
    };
    let _ = writeln!(out, "name: {}", config.name);
    let _ = writeln!(out, "mode: {mode}");
    let _ = writeln!(out, "level: {}", config.level);
    match &config.pretty {
        Some(pretty) => {
            let keys: Vec<&str> = pretty.ignore.iter().map(String::as_str).collect();
            let _ = writeln!(out, "output: pretty (ignoring {})", keys.join(","));
        }
        None => {
            let _ = writeln!(out, "output: json");
        }
    }
    let _ = write!(out, "level_in_string: {}", config.level_in_string);
    out
}
