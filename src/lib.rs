//! Environment-configured structured logging.
//!
//! The default level is `info`; set `LOG_LEVEL` to `trace`, `debug`, `info`,
//! `warn`, `error` or `fatal` to change it. Output is formatted for reading in
//! development. Set `NODE_ENV` to anything other than `development` (for
//! example `NODE_ENV=production`) to get line-delimited JSON suitable for a
//! log collector.
//!
//! ```no_run
//! let log = probot_log::get_logger()?;
//! log.info("I thought you should know…");
//! log.warn("Woah there");
//! log.in_scope(|| tracing::debug!(installation = 1, "…so is this"));
//! # Ok::<(), probot_log::LogError>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod level;
pub mod logging;

#[cfg(test)]
mod test_utils;

pub use config::{DeploymentMode, LogConfig, PrettyOptions};
pub use error::LogError;
pub use level::LogLevel;
pub use logging::{Logger, LoggerBuilder, get_logger};
