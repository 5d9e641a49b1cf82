//! Structured logging facade.
//!
//! A [`Logger`] is built once from a level and ordered [`LogOption`]s and then
//! emits leveled records as JSON lines or human-readable console output.
//! [`init`] installs a process-wide logger behind the free functions
//! [`info`], [`warn`], [`debug`] and [`error`].

mod console;
mod fields;
mod global;
mod layer;
mod level;
mod logger;
mod logging;
mod record;
mod writer;

pub use fields::{merge_fields, Fields};
pub use global::{debug, enabled, error, info, init, logger, shared, warn};
pub use layer::{install_level_bridge, install_tracing_bridge, level_filter, FacadeLayer};
pub use level::Level;
pub use logger::{
    with_ansi, with_caller, with_development_mode, with_field, with_metadata, with_writer,
    CallerMode, LogOption, Logger, LoggerBuilder,
};
pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use record::{Caller, Record};
pub use writer::MemoryWriter;
