//! Process-wide default logger.
//!
//! Built on top of [`Logger`]: [`init`] constructs one exactly once and the
//! free functions forward to it. Before `init` completes they discard output.

use std::sync::{Arc, OnceLock};

use super::fields::Fields;
use super::level::Level;
use super::logger::{LogOption, Logger};

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// Initialize the process-wide logger.
///
/// Only the first call's level and options take effect; every later call,
/// including concurrent ones racing the first, returns the same logger and
/// drops its own options. Callers never observe a partially built logger.
pub fn init(level: &str, options: impl IntoIterator<Item = LogOption>) -> &'static Logger {
    GLOBAL.get_or_init(|| Arc::new(Logger::new(level, options)))
}

/// The process-wide logger, if initialized.
pub fn logger() -> Option<&'static Logger> {
    GLOBAL.get().map(|l| &**l)
}

/// Shared handle to the process-wide logger for components that need ownership.
pub fn shared() -> Option<Arc<Logger>> {
    GLOBAL.get().cloned()
}

/// Whether a record at `level` would currently be written.
pub fn enabled(level: Level) -> bool {
    logger().is_some_and(|l| l.enabled(level))
}

#[track_caller]
pub fn debug(msg: &str, fields: &[&Fields]) {
    if let Some(l) = logger() {
        l.debug(msg, fields);
    }
}

#[track_caller]
pub fn info(msg: &str, fields: &[&Fields]) {
    if let Some(l) = logger() {
        l.info(msg, fields);
    }
}

#[track_caller]
pub fn warn(msg: &str, fields: &[&Fields]) {
    if let Some(l) = logger() {
        l.warn(msg, fields);
    }
}

#[track_caller]
pub fn error(err: &dyn std::error::Error, msg: &str, fields: &[&Fields]) {
    if let Some(l) = logger() {
        l.error(err, msg, fields);
    }
}
