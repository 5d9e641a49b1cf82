//! Logging configuration and initialization.
//!
//! Supports JSON and pretty-printed console formats with a configurable output path.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use serde::Deserialize;
use thiserror::Error;

use super::global;
use super::logger::{self, CallerMode, LogOption, Logger};
use crate::meta::Metadata;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logging (default for production).
    #[default]
    Json,
    /// Human-readable console output (for development).
    #[serde(alias = "console")]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "console" | "dev" => Ok(Self::Pretty),
            _ => Err(LogError::InvalidFormat(s.to_string())),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format (JSON or Pretty).
    pub format: LogFormat,
    /// Minimum level name; unrecognized names mean "info".
    pub level: String,
    /// Caller policy. None keeps the format's default.
    pub caller: Option<CallerMode>,
    /// Optional file path for log output. If None, logs to stdout.
    pub output_path: Option<PathBuf>,
    /// Colour escapes in pretty output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            caller: None,
            output_path: None,
            ansi: true,
        }
    }
}

#[derive(Deserialize)]
struct LogSection {
    #[serde(default)]
    log: LogConfig,
}

impl LogConfig {
    /// Parse the `[log]` table of a TOML document. A missing table yields defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, LogError> {
        let section: LogSection =
            toml::from_str(s).map_err(|e| LogError::InvalidConfig(e.to_string()))?;
        Ok(section.log)
    }

    /// Translate into logger options, metadata first.
    pub fn to_options(&self, meta: Option<&Metadata>) -> Result<Vec<LogOption>, LogError> {
        let mut options = Vec::new();
        if let Some(meta) = meta {
            options.push(logger::with_metadata(meta));
        }
        if self.format == LogFormat::Pretty {
            options.push(logger::with_development_mode());
        }
        if let Some(mode) = self.caller {
            options.push(logger::with_caller(mode));
        }
        options.push(logger::with_ansi(self.ansi));
        if let Some(path) = &self.output_path {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LogError::FileOpen(format!("{}: {}", path.display(), e)))?;
            options.push(logger::with_writer(Mutex::new(file)));
        }
        Ok(options)
    }

    /// Build a standalone logger without touching the process-wide one.
    pub fn build(&self, meta: Option<&Metadata>) -> Result<Logger, LogError> {
        Ok(Logger::new(&self.level, self.to_options(meta)?))
    }
}

/// Errors that can occur during logging setup.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),
    #[error("Invalid caller mode: {0}")]
    InvalidCallerMode(String),
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Failed to open log file: {0}")]
    FileOpen(String),
    #[error("Invalid log configuration: {0}")]
    InvalidConfig(String),
    #[error("Subscriber already initialized")]
    AlreadyInitialized,
    #[error("Logger not initialized")]
    NotInitialized,
}

/// Initialize the process-wide logger from configuration.
///
/// This should be called once at application startup. Later calls return the
/// logger from the first call.
pub fn init_logging(config: &LogConfig, meta: Option<&Metadata>) -> Result<&'static Logger, LogError> {
    if let Some(existing) = global::logger() {
        return Ok(existing);
    }
    let options = config.to_options(meta)?;
    Ok(global::init(&config.level, options))
}
