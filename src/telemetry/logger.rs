//! The facade logger: an immutable configuration plus leveled emit methods.
//!
//! A [`Logger`] is assembled once from a level and an ordered list of
//! [`LogOption`]s and never changes afterwards. Every emit method checks the
//! level first, so suppressed records cost a comparison and nothing else.

use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::console;
use super::fields::{merge_fields, Fields};
use super::level::Level;
use super::logging::{LogError, LogFormat};
use super::record::{Caller, Record};
use crate::meta::Metadata;

/// When to attach the call site to a record.
///
/// Error-level records always carry a caller regardless of mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerMode {
    Never,
    /// Only debug and trace records.
    DebugAndBelow,
    Always,
}

impl CallerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::DebugAndBelow => "debug_and_below",
            Self::Always => "always",
        }
    }
}

impl FromStr for CallerMode {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "off" | "none" => Ok(Self::Never),
            "debug" | "debug_and_below" => Ok(Self::DebugAndBelow),
            "always" | "on" => Ok(Self::Always),
            _ => Err(LogError::InvalidCallerMode(s.to_string())),
        }
    }
}

/// A single configuration step applied while building a [`Logger`].
pub enum LogOption {
    /// Attach discovered runtime metadata as base fields.
    Metadata(Metadata),
    /// Console rendering with caller capture on every record.
    DevelopmentMode,
    /// Explicit caller policy. Takes precedence over the format default.
    Caller(CallerMode),
    /// One static base field.
    Field(String, Value),
    /// Destination for encoded records.
    Writer(BoxMakeWriter),
    /// Colour escapes in console output.
    Ansi(bool),
}

impl fmt::Debug for LogOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata(m) => f.debug_tuple("Metadata").field(m).finish(),
            Self::DevelopmentMode => f.write_str("DevelopmentMode"),
            Self::Caller(mode) => f.debug_tuple("Caller").field(mode).finish(),
            Self::Field(k, v) => f.debug_tuple("Field").field(k).field(v).finish(),
            Self::Writer(_) => f.write_str("Writer(..)"),
            Self::Ansi(on) => f.debug_tuple("Ansi").field(on).finish(),
        }
    }
}

pub fn with_metadata(meta: &Metadata) -> LogOption {
    LogOption::Metadata(meta.clone())
}

pub fn with_development_mode() -> LogOption {
    LogOption::DevelopmentMode
}

pub fn with_caller(mode: CallerMode) -> LogOption {
    LogOption::Caller(mode)
}

pub fn with_field(key: impl Into<String>, value: impl Into<Value>) -> LogOption {
    LogOption::Field(key.into(), value.into())
}

/// Send records to any `tracing_subscriber` writer factory instead of stdout.
pub fn with_writer<W>(writer: W) -> LogOption
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    LogOption::Writer(BoxMakeWriter::new(writer))
}

pub fn with_ansi(enabled: bool) -> LogOption {
    LogOption::Ansi(enabled)
}

/// Accumulates options before a [`Logger`] is frozen.
pub struct LoggerBuilder {
    level: Level,
    fields: Vec<(String, Value)>,
    format: LogFormat,
    caller: Option<CallerMode>,
    ansi: bool,
    writer: BoxMakeWriter,
}

impl LoggerBuilder {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            fields: Vec::new(),
            format: LogFormat::Json,
            caller: None,
            ansi: true,
            writer: BoxMakeWriter::new(std::io::stdout),
        }
    }

    /// Apply one option. Later options override earlier ones touching the same setting.
    pub fn option(mut self, option: LogOption) -> Self {
        match option {
            LogOption::Metadata(meta) => {
                for (key, value) in meta.log_fields() {
                    self.set_field(key.to_string(), Value::String(value));
                }
            }
            LogOption::DevelopmentMode => self.format = LogFormat::Pretty,
            LogOption::Caller(mode) => self.caller = Some(mode),
            LogOption::Field(key, value) => self.set_field(key, value),
            LogOption::Writer(writer) => self.writer = writer,
            LogOption::Ansi(enabled) => self.ansi = enabled,
        }
        self
    }

    pub fn options(self, options: impl IntoIterator<Item = LogOption>) -> Self {
        options.into_iter().fold(self, Self::option)
    }

    fn set_field(&mut self, key: String, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn build(self) -> Logger {
        let caller = self.caller.unwrap_or(match self.format {
            LogFormat::Json => CallerMode::DebugAndBelow,
            LogFormat::Pretty => CallerMode::Always,
        });
        Logger {
            level: self.level,
            fields: self.fields,
            format: self.format,
            caller,
            ansi: self.ansi,
            writer: self.writer,
        }
    }
}

/// Structured logger with a fixed level, base fields, format and sink.
pub struct Logger {
    level: Level,
    fields: Vec<(String, Value)>,
    format: LogFormat,
    caller: CallerMode,
    ansi: bool,
    writer: BoxMakeWriter,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("fields", &self.fields)
            .field("format", &self.format)
            .field("caller", &self.caller)
            .field("ansi", &self.ansi)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Build a logger from a level name and options applied in order.
    ///
    /// Unrecognized level names fall back to `info`.
    pub fn new(level: &str, options: impl IntoIterator<Item = LogOption>) -> Self {
        Self::builder(Level::parse_or_default(level))
            .options(options)
            .build()
    }

    pub fn builder(level: Level) -> LoggerBuilder {
        LoggerBuilder::new(level)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn caller_mode(&self) -> CallerMode {
        self.caller
    }

    pub fn base_fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn wants_caller(&self, level: Level, has_error: bool) -> bool {
        if has_error || level >= Level::Error {
            return true;
        }
        match self.caller {
            CallerMode::Never => false,
            CallerMode::DebugAndBelow => level <= Level::Debug,
            CallerMode::Always => true,
        }
    }

    #[track_caller]
    pub fn trace(&self, msg: &str, fields: &[&Fields]) {
        self.log(Level::Trace, msg, fields);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[&Fields]) {
        self.log(Level::Debug, msg, fields);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[&Fields]) {
        self.log(Level::Info, msg, fields);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[&Fields]) {
        self.log(Level::Warn, msg, fields);
    }

    /// Log an error record. The error's description goes in the `error` field.
    #[track_caller]
    pub fn error(&self, err: &dyn std::error::Error, msg: &str, fields: &[&Fields]) {
        if !self.enabled(Level::Error) {
            return;
        }
        self.emit(
            Level::Error,
            msg,
            merge_fields(fields),
            Some(err.to_string()),
            Some(Location::caller().into()),
        );
    }

    /// Log at an arbitrary level, capturing the call site.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[&Fields]) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, msg, merge_fields(fields), None, Some(Location::caller().into()));
    }

    /// Encode and write one record with an explicit caller. Records below the
    /// configured level are dropped. A `None` caller is never attached.
    pub fn emit(
        &self,
        level: Level,
        msg: &str,
        fields: Fields,
        error: Option<String>,
        caller: Option<Caller>,
    ) {
        if !self.enabled(level) {
            return;
        }
        let record = Record {
            level,
            time: Utc::now(),
            message: msg,
            base_fields: &self.fields,
            fields,
            caller: caller.filter(|_| self.wants_caller(level, error.is_some())),
            error,
        };
        let line = match self.format {
            LogFormat::Json => record.to_json_line(),
            LogFormat::Pretty => console::render(&record, self.ansi),
        };
        // Sink failures are not surfaced; logging is fire-and-forget.
        let mut writer = self.writer.make_writer();
        let _ = writer.write_all(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::MemoryWriter;
    use serde_json::json;

    fn json_logger(level: &str, extra: Vec<LogOption>) -> (Logger, MemoryWriter) {
        let out = MemoryWriter::new();
        let mut options = vec![with_writer(out.clone())];
        options.extend(extra);
        (Logger::new(level, options), out)
    }

    #[derive(Debug)]
    struct SampleError;

    impl fmt::Display for SampleError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("sample error")
        }
    }

    impl std::error::Error for SampleError {}

    #[test]
    fn test_info_json_record() {
        let (logger, out) = json_logger("info", vec![]);
        logger.info("hello", &[&crate::fields! { "k" => "v" }]);

        let records = out.json_lines();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "info");
        assert_eq!(records[0]["message"], "hello");
        assert_eq!(records[0]["k"], "v");
        assert!(records[0].get("caller").is_none());
    }

    #[test]
    fn test_below_level_is_suppressed() {
        let (logger, out) = json_logger("warn", vec![]);
        logger.info("no", &[]);
        logger.debug("no", &[]);
        logger.trace("no", &[]);
        assert!(out.contents().is_empty());

        logger.warn("yes", &[]);
        assert_eq!(out.json_lines().len(), 1);
    }

    #[test]
    fn test_fatal_level_suppresses_errors() {
        let (logger, out) = json_logger("fatal", vec![]);
        logger.error(&SampleError, "dropped", &[]);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        let (logger, out) = json_logger("chatty", vec![]);
        assert_eq!(logger.level(), Level::Info);
        logger.debug("hidden", &[]);
        logger.info("shown", &[]);
        let records = out.json_lines();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "shown");
    }

    #[test]
    fn test_merge_right_wins() {
        let (logger, out) = json_logger("info", vec![]);
        let first = crate::fields! { "a" => 1 };
        let second = crate::fields! { "a" => 2 };
        logger.info("m", &[&first, &second]);
        assert_eq!(out.json_lines()[0]["a"], json!(2));
        assert_eq!(first["a"], json!(1));
    }

    #[test]
    fn test_debug_records_carry_caller() {
        let (logger, out) = json_logger("debug", vec![]);
        logger.debug("with caller", &[]);
        let line = line!() - 1;
        let records = out.json_lines();
        assert_eq!(records[0]["caller"], format!("logger.rs:{}", line));
    }

    #[test]
    fn test_error_record_has_error_and_caller() {
        let (logger, out) = json_logger("info", vec![with_caller(CallerMode::Never)]);
        logger.error(&SampleError, "An error occurred", &[&crate::fields! { "code" => 500 }]);
        let records = out.json_lines();
        assert_eq!(records[0]["level"], "error");
        assert_eq!(records[0]["error"], "sample error");
        assert_eq!(records[0]["message"], "An error occurred");
        assert_eq!(records[0]["code"], 500);
        assert!(records[0]["caller"].as_str().unwrap().starts_with("logger.rs:"));
    }

    #[test]
    fn test_development_mode_defaults_caller_always() {
        let (logger, _) = json_logger("info", vec![with_development_mode()]);
        assert_eq!(logger.format(), LogFormat::Pretty);
        assert_eq!(logger.caller_mode(), CallerMode::Always);
    }

    #[test]
    fn test_explicit_caller_wins_over_format_default_in_any_order() {
        let (before, _) = json_logger(
            "info",
            vec![with_caller(CallerMode::Never), with_development_mode()],
        );
        let (after, _) = json_logger(
            "info",
            vec![with_development_mode(), with_caller(CallerMode::Never)],
        );
        assert_eq!(before.caller_mode(), CallerMode::Never);
        assert_eq!(after.caller_mode(), CallerMode::Never);
    }

    #[test]
    fn test_development_mode_keeps_custom_writer() {
        let (logger, out) = json_logger("debug", vec![with_development_mode(), with_ansi(false)]);
        logger.info("Info log in dev mode", &[]);
        logger.debug("Debug log in dev mode", &[]);
        let text = out.contents();
        assert!(text.contains("INF"));
        assert!(text.contains("DBG"));
        assert!(text.contains("Info log in dev mode"));
        assert!(serde_json::from_str::<Value>(&text).is_err());
    }

    #[test]
    fn test_static_fields_and_later_override() {
        let (logger, out) = json_logger(
            "info",
            vec![with_field("service", "a"), with_field("service", "b"), with_field("zone", 3)],
        );
        assert_eq!(logger.base_fields().len(), 2);
        logger.info("m", &[]);
        let rec = &out.json_lines()[0];
        assert_eq!(rec["service"], "b");
        assert_eq!(rec["zone"], 3);
    }

    #[test]
    fn test_caller_mode_parse() {
        assert_eq!("always".parse::<CallerMode>().unwrap(), CallerMode::Always);
        assert_eq!("Debug".parse::<CallerMode>().unwrap(), CallerMode::DebugAndBelow);
        assert_eq!("off".parse::<CallerMode>().unwrap(), CallerMode::Never);
        assert!("sometimes".parse::<CallerMode>().is_err());
    }
}
