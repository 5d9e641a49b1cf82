//! core-kit: structured logging facade.
//!
//! One initialization point configures a structured logger (level, output
//! format, timestamp and caller enrichment) and four leveled functions emit
//! records with optional key/value fields. Runtime metadata discovery attaches
//! host and deployment identity to every line.
//!
//! # Example
//!
//! ```no_run
//! use core_kit::{fields, meta, telemetry};
//!
//! let metadata = meta::discover("billing", "1.4.0", "prod");
//! let mut options = vec![telemetry::with_development_mode()];
//! if let Some(m) = &metadata {
//!     options.push(telemetry::with_metadata(m));
//! }
//! telemetry::init("debug", options);
//!
//! telemetry::info("service started", &[&fields! { "port" => 8080 }]);
//! ```
//!
//! Records go to stdout as one JSON object per line, or as coloured console
//! lines in development mode. Nothing is buffered, rotated or shipped.

pub mod config;
pub mod meta;
pub mod telemetry;

#[doc(hidden)]
pub use serde_json;
