//! Bridge from `tracing` events into the facade logger.
//!
//! Lets code that logs through `tracing::info!` and friends share the facade's
//! output format, base fields and sink.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::fields::Fields;
use super::level::Level;
use super::logger::Logger;
use super::logging::LogError;
use super::record::Caller;

/// `tracing_subscriber` layer that re-emits events through a [`Logger`].
///
/// The event's `message` becomes the record message, a field named `error`
/// becomes the record error, and every other field is attached as-is.
#[derive(Debug, Clone)]
pub struct FacadeLayer {
    logger: Arc<Logger>,
}

impl FacadeLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    error: Option<String>,
    fields: Fields,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            "error" => {
                self.error = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for EventVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}

impl<S: Subscriber> Layer<S> for FacadeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = Level::from(*meta.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = meta
            .line()
            .filter(|&line| line > 0)
            .map(|line| Caller::new(meta.file().unwrap_or(meta.target()), line));
        self.logger.emit(
            level,
            visitor.message.as_deref().unwrap_or_default(),
            visitor.fields,
            visitor.error,
            caller,
        );
    }
}

/// `tracing` filter matching a facade level. `fatal` and `panic` have no
/// `tracing` counterpart; they pass errors through and the logger drops them.
pub fn level_filter(level: Level) -> LevelFilter {
    match level {
        Level::Trace => LevelFilter::TRACE,
        Level::Debug => LevelFilter::DEBUG,
        Level::Info => LevelFilter::INFO,
        Level::Warn => LevelFilter::WARN,
        Level::Error | Level::Fatal | Level::Panic => LevelFilter::ERROR,
    }
}

/// Route `tracing` events at or above the process-wide logger's level into it.
///
/// Fails if [`init`](super::init) has not run or a global subscriber is already set.
pub fn install_level_bridge() -> Result<(), LogError> {
    let logger = super::global::shared().ok_or(LogError::NotInitialized)?;
    let filter = level_filter(logger.level());

    tracing_subscriber::registry()
        .with(filter)
        .with(FacadeLayer::new(logger))
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)?;
    Ok(())
}

/// Route `tracing` events matching `directives` into the process-wide logger.
///
/// `directives` uses `EnvFilter` syntax, e.g. `"info"` or `"my_app=debug,hyper=warn"`.
/// Fails if [`init`](super::init) has not run or a global subscriber is already set.
pub fn install_tracing_bridge(directives: &str) -> Result<(), LogError> {
    let logger = super::global::shared().ok_or(LogError::NotInitialized)?;
    let filter =
        EnvFilter::try_new(directives).map_err(|e| LogError::InvalidFilter(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(FacadeLayer::new(logger))
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)?;
    Ok(())
}
