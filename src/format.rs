//! Record renderers plugged into the `tracing-subscriber` fmt layer.
//!
//! * [`PrettyFormat`]: development output, `INFO (probot): message` followed by
//!   one indented line per remaining field. Keys in the ignore set are dropped,
//!   including the header's time, pid and hostname.
//! * [`JsonFormat`]: production output, one JSON object per line with numeric
//!   severity, epoch-millisecond time, pid, hostname, name and message.
//!
//! Both collect event fields through [`EventFields`] so message extraction is
//! handled identically.

use crate::config::PrettyOptions;
use crate::level::LogLevel;
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::fmt::{self, Write as _};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const MESSAGE_FIELD: &str = "message";

/// Field values of one event, in recording order.
#[derive(Debug, Default)]
pub(crate) struct EventFields {
    pub message: Option<String>,
    pub fields: Vec<(&'static str, Value)>,
}

impl EventFields {
    pub fn of(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn push(&mut self, field: &Field, value: Value) {
        match field.name() {
            MESSAGE_FIELD => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, Value::from(format!("{value:?}")));
    }
}

pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub(crate) fn hostname() -> &'static str {
    static HOSTNAME: OnceCell<String> = OnceCell::new();
    HOSTNAME.get_or_init(|| gethostname::gethostname().to_string_lossy().into_owned())
}

/// Human-readable renderer for development.
#[derive(Debug, Clone)]
pub struct PrettyFormat {
    name: String,
    options: PrettyOptions,
}

impl PrettyFormat {
    /// Renderer tagging records with `name` and hiding `options.ignore`.
    pub fn new(name: impl Into<String>, options: PrettyOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Render one record without the trailing newline.
    pub(crate) fn render(&self, level: LogLevel, record: &EventFields) -> String {
        let ignored = |key: &str| self.options.ignores(key);
        let mut out = String::new();

        if !ignored("time") {
            let _ = write!(out, "[{}] ", epoch_millis());
        }
        out.push_str(level.label());

        // (name/pid on hostname)
        let mut origin = String::new();
        if !ignored("name") {
            origin.push_str(&self.name);
        }
        if !ignored("pid") {
            if !origin.is_empty() {
                origin.push('/');
            }
            let _ = write!(origin, "{}", std::process::id());
        }
        if !ignored("hostname") {
            if !origin.is_empty() {
                origin.push_str(" on ");
            }
            origin.push_str(hostname());
        }
        if !origin.is_empty() {
            let _ = write!(out, " ({origin})");
        }

        out.push(':');
        if let Some(message) = &record.message {
            let _ = write!(out, " {message}");
        }

        for (key, value) in &record.fields {
            if ignored(key) {
                continue;
            }
            match value {
                Value::String(s) => {
                    let _ = write!(out, "\n    {key}: {s}");
                }
                other => {
                    let _ = write!(out, "\n    {key}: {other}");
                }
            }
        }
        out
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = LogLevel::of_metadata(event.metadata());
        let record = EventFields::of(event);
        writeln!(writer, "{}", self.render(level, &record))
    }
}

/// Line-delimited JSON renderer for production.
#[derive(Debug, Clone)]
pub struct JsonFormat {
    name: String,
    level_in_string: bool,
}

impl JsonFormat {
    /// Renderer tagging records with `name`; `level_in_string` writes labels instead of severities.
    pub fn new(name: impl Into<String>, level_in_string: bool) -> Self {
        Self {
            name: name.into(),
            level_in_string,
        }
    }

    /// Build the JSON object for one record.
    ///
    /// Core keys come first, in the order `level, time, pid, hostname, name, msg`,
    /// followed by event fields in recording order. Event fields never replace
    /// a core key.
    pub(crate) fn render(&self, level: LogLevel, record: EventFields) -> Map<String, Value> {
        let mut map = Map::new();
        let level = if self.level_in_string {
            Value::from(level.as_str())
        } else {
            Value::from(level.severity())
        };
        map.insert("level".into(), level);
        map.insert("time".into(), Value::from(epoch_millis()));
        map.insert("pid".into(), Value::from(std::process::id()));
        map.insert("hostname".into(), Value::from(hostname()));
        map.insert("name".into(), Value::from(self.name.as_str()));
        if let Some(message) = record.message {
            map.insert("msg".into(), Value::from(message));
        }
        for (key, value) in record.fields {
            map.entry(key).or_insert(value);
        }
        map
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = LogLevel::of_metadata(event.metadata());
        let record = self.render(level, EventFields::of(event));
        let line = serde_json::to_string(&record).map_err(|_| fmt::Error)?;
        writeln!(writer, "{line}")
    }
}
