//! Runtime metadata for enriching log records.

mod discovery;

pub use discovery::{
    discover, discover_with, mark_process_start, process_start_time, Metadata, NODE_NAME_ENV,
    POD_NAMESPACE_ENV, POD_NAME_ENV, START_TIME_LAYOUT,
};
