//! Runtime identity discovery.
//!
//! Hostname comes from the OS, deployment placement from the downward-API
//! environment variables a Kubernetes pod is typically given.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use serde::Serialize;

/// Layout of [`Metadata::start_time`].
pub const START_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

pub const POD_NAME_ENV: &str = "POD_NAME";
pub const POD_NAMESPACE_ENV: &str = "POD_NAMESPACE";
pub const NODE_NAME_ENV: &str = "NODE_NAME";

const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_NODE_NAME: &str = "unknown";

const INSTANCE_ID_LEN: usize = 8;
const INSTANCE_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

static START_TIME: LazyLock<String> =
    LazyLock::new(|| Utc::now().format(START_TIME_LAYOUT).to_string());

static GENERATED_INSTANCE_ID: OnceLock<String> = OnceLock::new();

/// Snapshot of where and what this process is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub hostname: String,
    pub pod_name: String,
    pub namespace: String,
    pub node_name: String,
    pub app_name: String,
    pub app_version: String,
    pub env: String,
    /// UTC, formatted with [`START_TIME_LAYOUT`].
    pub start_time: String,
    pub uptime: Duration,
    pub instance_id: String,
}

impl Metadata {
    /// Fields attached to every record by `with_metadata`.
    pub fn log_fields(&self) -> [(&'static str, String); 8] {
        [
            ("hostname", self.hostname.clone()),
            ("app_name", self.app_name.clone()),
            ("app_version", self.app_version.clone()),
            ("env", self.env.clone()),
            ("pod_name", self.pod_name.clone()),
            ("namespace", self.namespace.clone()),
            ("node_name", self.node_name.clone()),
            ("instance_id", self.instance_id.clone()),
        ]
    }
}

/// Pin the process start time. Call early in `main` so uptime is measured
/// from startup rather than from the first discovery.
pub fn mark_process_start() {
    LazyLock::force(&START_TIME);
}

/// Process start time as recorded, formatted with [`START_TIME_LAYOUT`].
pub fn process_start_time() -> &'static str {
    START_TIME.as_str()
}

/// Discover metadata from the OS and process environment.
///
/// Returns `None` only if the recorded start time cannot be read back.
pub fn discover(app_name: &str, app_version: &str, env: &str) -> Option<Metadata> {
    discover_with(app_name, app_version, env, |key| std::env::var(key).ok())
}

/// Like [`discover`], reading environment variables through `lookup`.
pub fn discover_with<F>(app_name: &str, app_version: &str, env: &str, lookup: F) -> Option<Metadata>
where
    F: Fn(&str) -> Option<String>,
{
    let start_time = process_start_time();
    let uptime = uptime_since(start_time)?;

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default();

    let var = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());
    let pod_name = var(POD_NAME_ENV, "");
    let instance_id = instance_id_for(&pod_name);

    Some(Metadata {
        hostname,
        namespace: var(POD_NAMESPACE_ENV, DEFAULT_NAMESPACE),
        node_name: var(NODE_NAME_ENV, DEFAULT_NODE_NAME),
        pod_name,
        app_name: app_name.to_string(),
        app_version: app_version.to_string(),
        env: env.to_string(),
        start_time: start_time.to_string(),
        uptime,
        instance_id,
    })
}

fn uptime_since(start_time: &str) -> Option<Duration> {
    let since = NaiveDateTime::parse_from_str(start_time, START_TIME_LAYOUT).ok()?;
    // Clock steps backwards clamp to zero.
    Some((Utc::now().naive_utc() - since).to_std().unwrap_or_default())
}

/// Pod name when running in a pod, otherwise a random id fixed for the process.
fn instance_id_for(pod_name: &str) -> String {
    if !pod_name.is_empty() {
        return pod_name.to_string();
    }
    GENERATED_INSTANCE_ID
        .get_or_init(|| short_id(INSTANCE_ID_LEN))
        .clone()
}

/// Random lowercase alphanumeric token from the OS CSPRNG.
fn short_id(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| INSTANCE_ID_ALPHABET[rng.gen_range(0..INSTANCE_ID_ALPHABET.len())] as char)
        .collect()
}
