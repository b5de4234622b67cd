//! Command-line front end for the environment-configured logger.
//!
//! Resolves the same configuration an application would get from
//! `probot_log::get_logger()` (`NODE_ENV`, `LOG_LEVEL`, `LOG_LEVEL_IN_STRING`),
//! optionally overridden by `-v` / `-q`, then either prints it or emits one
//! message through it. Handy for checking what a deployment will log before
//! shipping it.

mod cli;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use probot_log::{LogConfig, LogLevel, Logger};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(
    version,
    about = concat!(
        env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"),
        " - Emit a message through the logger configured by NODE_ENV and LOG_LEVEL.",
    )
)]
struct Cli {
    /// Words of the message to emit.
    message: Vec<String>,
    /// Level to emit the message at.
    #[arg(long = "at", value_enum, default_value_t = LogLevel::Info)]
    at: LogLevel,
    /// Print the resolved configuration instead of logging.
    #[arg(long = "show-config")]
    show_config: bool,
    /// Increase verbosity (-v=debug, -vv=trace). Overrides LOG_LEVEL.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
    /// Quiet mode: only warnings and above. Overrides -v and LOG_LEVEL.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LogConfig::from_env().context("reading logger configuration")?;
    if let Some(level) = cli::level_override(cli.quiet, cli.verbose) {
        config.level = level;
    }

    if cli.show_config {
        println!("{}", cli::describe_config(&config));
        return Ok(());
    }

    let logger = Logger::new(config);
    logger.in_scope(|| {
        tracing::debug!(
            version = env!("CARGO_PKG_VERSION"),
            threshold = %logger.level(),
            pretty = logger.config().is_pretty(),
            "logger ready"
        )
    });

    let message = cli.message.join(" ");
    if !message.is_empty() {
        logger.log(cli.at, &message);
    }
    Ok(())
}
