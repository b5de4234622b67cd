//! Logger construction and the leveled call surface.
//!
//! A [`Logger`] owns its own `tracing` dispatcher instead of installing one
//! globally, so it can be built once at startup and handed to whoever needs it.
//! Call [`Logger::install`] to make it the process-wide default as well.

use crate::config::LogConfig;
use crate::error::LogError;
use crate::format::{JsonFormat, PrettyFormat};
use crate::level::{FATAL_TARGET, LogLevel};
use tracing::Dispatch;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

/// Build a logger from `NODE_ENV` and `LOG_LEVEL`, writing to stdout.
pub fn get_logger() -> Result<Logger, LogError> {
    Ok(Logger::new(LogConfig::from_env()?))
}

/// Configured logger handle. Cloning is cheap and clones share the same output.
#[derive(Clone, Debug)]
pub struct Logger {
    config: LogConfig,
    dispatch: Dispatch,
}

/// Builder for a [`Logger`] whose output goes somewhere other than stdout.
pub struct LoggerBuilder {
    config: LogConfig,
    writer: BoxMakeWriter,
}

impl LoggerBuilder {
    /// Start from `config`, writing to stdout.
    pub fn new(config: LogConfig) -> Self {
        Self {
            config,
            writer: BoxMakeWriter::new(std::io::stdout),
        }
    }

    /// Send records somewhere other than stdout.
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = BoxMakeWriter::new(writer);
        self
    }

    /// Assemble the subscriber stack selected by the configuration.
    pub fn build(self) -> Logger {
        let LoggerBuilder { config, writer } = self;
        let threshold = config.level;
        let filter = filter_fn(move |meta| threshold.admits(meta));

        let dispatch = match &config.pretty {
            Some(options) => {
                let layer = tracing_subscriber::fmt::layer()
                    .event_format(PrettyFormat::new(config.name.clone(), options.clone()))
                    .with_writer(writer)
                    .with_filter(filter);
                Dispatch::new(tracing_subscriber::registry().with(layer))
            }
            None => {
                let layer = tracing_subscriber::fmt::layer()
                    .event_format(JsonFormat::new(config.name.clone(), config.level_in_string))
                    .with_writer(writer)
                    .with_filter(filter);
                Dispatch::new(tracing_subscriber::registry().with(layer))
            }
        };

        Logger { config, dispatch }
    }
}

impl Logger {
    /// Build a logger for `config` that writes to stdout.
    pub fn new(config: LogConfig) -> Self {
        LoggerBuilder::new(config).build()
    }

    /// Start a [`LoggerBuilder`] for `config`.
    pub fn builder(config: LogConfig) -> LoggerBuilder {
        LoggerBuilder::new(config)
    }

    /// The configuration this logger was built from.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Effective threshold.
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// Name tag written with every record.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Whether records at `level` pass this logger's threshold.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.config.level
    }

    /// Run `f` with this logger as the thread's default, so plain `tracing`
    /// macros (with structured fields) are routed through it.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the process-wide default. Only the first call succeeds.
    pub fn install(&self) -> Result<(), LogError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }

    /// Emit `message` at `level`.
    pub fn log(&self, level: LogLevel, message: &str) {
        self.in_scope(|| match level {
            LogLevel::Trace => trace!("{message}"),
            LogLevel::Debug => debug!("{message}"),
            LogLevel::Info => info!("{message}"),
            LogLevel::Warn => warn!("{message}"),
            LogLevel::Error => error!("{message}"),
            LogLevel::Fatal => error!(target: FATAL_TARGET, "{message}"),
        })
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeploymentMode, PrettyOptions};
    use crate::test_utils::CaptureWriter;
    use serde_json::Value;

    fn capture(config: LogConfig) -> (Logger, CaptureWriter) {
        let out = CaptureWriter::default();
        let logger = Logger::builder(config).writer(out.clone()).build();
        (logger, out)
    }

    fn emit_every_level(logger: &Logger) {
        for level in LogLevel::ALL {
            logger.log(level, level.as_str());
        }
    }

    fn json_lines(out: &CaptureWriter) -> Vec<Value> {
        out.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("each line is a JSON record"))
            .collect()
    }

    #[test]
    fn threshold_drops_lower_levels() {
        for threshold in LogLevel::ALL {
            let (logger, out) =
                capture(LogConfig::for_mode(DeploymentMode::Production, threshold));
            assert_eq!(logger.level(), threshold);

            emit_every_level(&logger);

            let written: Vec<String> = json_lines(&out)
                .iter()
                .map(|r| r["msg"].as_str().unwrap().to_string())
                .collect();
            let expected: Vec<String> = LogLevel::ALL
                .into_iter()
                .filter(|l| *l >= threshold)
                .map(|l| l.as_str().to_string())
                .collect();
            assert_eq!(written, expected, "threshold {threshold}");
        }
    }

    #[test]
    fn fatal_threshold_drops_plain_errors() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Fatal));

        logger.error("recoverable");
        logger.fatal("goodbye");

        let records = json_lines(&out);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], 60);
        assert_eq!(records[0]["msg"], "goodbye");
        assert!(records[0].get("fatal").is_none());
    }

    #[test]
    fn fatal_target_carries_fields() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Fatal));

        logger.in_scope(|| tracing::error!(target: FATAL_TARGET, code = 3, "giving up"));

        let records = json_lines(&out);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], 60);
        assert_eq!(records[0]["code"], 3);
    }

    #[test]
    fn user_fatal_field_is_not_a_fatal_record() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Fatal));

        logger.in_scope(|| tracing::error!(fatal = false, "recoverable after all"));

        assert!(out.lines().is_empty());
    }

    #[test]
    fn user_fatal_field_is_kept() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Info));

        logger.in_scope(|| tracing::warn!(fatal = "disk nearly full", "warning"));

        let records = json_lines(&out);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], 40);
        assert_eq!(records[0]["fatal"], "disk nearly full");
    }

    #[test]
    fn structured_records_are_tagged_and_typed() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Debug));

        logger.in_scope(|| {
            tracing::debug!(installation = 42_u64, retry = true, repo = "probot/probot", "webhook received");
        });

        let records = json_lines(&out);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], 20);
        assert_eq!(record["name"], "probot");
        assert_eq!(record["msg"], "webhook received");
        assert_eq!(record["installation"], 42);
        assert_eq!(record["retry"], true);
        assert_eq!(record["repo"], "probot/probot");
        assert!(record["time"].is_u64());
        assert!(record["hostname"].is_string());
    }

    #[test]
    fn pretty_output_suppresses_request_fields() {
        let (logger, out) = capture(LogConfig::default());

        logger.info("started");
        logger.in_scope(|| {
            tracing::info!(req = "GET /", res = 200, responseTime = 3, event = "push", "request done");
        });
        logger.debug("hidden at info");

        assert_eq!(
            out.lines(),
            vec![
                "INFO (probot): started".to_string(),
                "INFO (probot): request done".to_string(),
                "    event: push".to_string(),
            ]
        );
    }

    #[test]
    fn pretty_fatal_label() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Development, LogLevel::Trace));

        logger.trace("now we're talking");
        logger.fatal("goodbye, cruel world");

        assert_eq!(
            out.lines(),
            vec![
                "TRACE (probot): now we're talking".to_string(),
                "FATAL (probot): goodbye, cruel world".to_string(),
            ]
        );
    }

    #[test]
    fn custom_ignore_set_is_respected() {
        let mut config = LogConfig::default();
        config.pretty = Some(PrettyOptions {
            ignore: ["time", "pid", "hostname", "secret"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        });
        let (logger, out) = capture(config);

        logger.in_scope(|| tracing::warn!(secret = "hunter2", req = "kept", "careful"));

        assert_eq!(
            out.lines(),
            vec!["WARN (probot): careful".to_string(), "    req: kept".to_string()]
        );
    }

    #[test]
    fn level_in_string_renders_labels() {
        let mut config = LogConfig::for_mode(DeploymentMode::Production, LogLevel::Info);
        config.level_in_string = true;
        let (logger, out) = capture(config);

        logger.warn("woah there");

        assert_eq!(json_lines(&out)[0]["level"], "warn");
    }

    #[test]
    fn enabled_follows_threshold() {
        let logger = Logger::new(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Warn));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warn));
        assert!(logger.enabled(LogLevel::Fatal));
        assert_eq!(logger.name(), "probot");
    }

    #[test]
    fn clones_share_output_across_threads() {
        let (logger, out) = capture(LogConfig::for_mode(DeploymentMode::Production, LogLevel::Info));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let logger = logger.clone();
                std::thread::spawn(move || logger.info(&format!("worker {i}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(json_lines(&out).len(), 4);
    }
}
