//! Logging configuration loading from environment variables.
//!
//! All values are loaded from `CORE_KIT_*` environment variables with sensible
//! defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `CORE_KIT_LOG_LEVEL` | info | Minimum level (trace..panic) |
//! | `CORE_KIT_LOG_FORMAT` | json | `json` or `console` |
//! | `CORE_KIT_LOG_CALLER` | (format default) | `never`, `debug`, `always` |
//! | `CORE_KIT_LOG_OUTPUT` | (stdout) | Append records to this file |
//! | `NO_COLOR` | (unset) | Any non-empty value disables ANSI colour |
//! | `CORE_KIT_APP_NAME` | core-kit | Application name for metadata |
//! | `CORE_KIT_APP_VERSION` | crate version | Application version for metadata |
//! | `CORE_KIT_ENV` | local | Deployment environment label |

use std::path::PathBuf;

use crate::telemetry::{CallerMode, Level, LogConfig, LogFormat};

pub const LOG_LEVEL_ENV: &str = "CORE_KIT_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "CORE_KIT_LOG_FORMAT";
pub const LOG_CALLER_ENV: &str = "CORE_KIT_LOG_CALLER";
pub const LOG_OUTPUT_ENV: &str = "CORE_KIT_LOG_OUTPUT";
pub const NO_COLOR_ENV: &str = "NO_COLOR";
pub const APP_NAME_ENV: &str = "CORE_KIT_APP_NAME";
pub const APP_VERSION_ENV: &str = "CORE_KIT_APP_VERSION";
pub const APP_ENV_ENV: &str = "CORE_KIT_ENV";

/// Application identity used for metadata discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub version: String,
    pub env: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            name: "core-kit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            env: "local".to_string(),
        }
    }
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log: LogConfig,
    pub app: AppIdentity,
}

/// Read a non-empty env var.
fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an env var with `FromStr`, returning None on missing or invalid.
fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    var(key).and_then(|v| v.parse().ok())
}

/// Load logging configuration from environment.
fn load_log_config() -> LogConfig {
    let defaults = LogConfig::default();
    // Validate the level here so an invalid value reports as the default.
    let level = parse_var::<Level>(LOG_LEVEL_ENV)
        .map(|l| l.as_str().to_string())
        .unwrap_or(defaults.level);
    LogConfig {
        level,
        format: parse_var::<LogFormat>(LOG_FORMAT_ENV).unwrap_or(defaults.format),
        caller: parse_var::<CallerMode>(LOG_CALLER_ENV),
        output_path: var(LOG_OUTPUT_ENV).map(PathBuf::from),
        ansi: var(NO_COLOR_ENV).is_none(),
    }
}

/// Load application identity from environment.
fn load_app_identity() -> AppIdentity {
    let defaults = AppIdentity::default();
    AppIdentity {
        name: var(APP_NAME_ENV).unwrap_or(defaults.name),
        version: var(APP_VERSION_ENV).unwrap_or(defaults.version),
        env: var(APP_ENV_ENV).unwrap_or(defaults.env),
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    EnvConfig {
        log: load_log_config(),
        app: load_app_identity(),
    }
}

impl EnvConfig {
    /// Effective values as `(variable, value)` pairs, for display.
    pub fn effective_pairs(&self) -> Vec<(&'static str, String)> {
        let format = match self.log.format {
            LogFormat::Json => "json",
            LogFormat::Pretty => "console",
        };
        vec![
            (LOG_LEVEL_ENV, self.log.level.clone()),
            (LOG_FORMAT_ENV, format.to_string()),
            (
                LOG_CALLER_ENV,
                self.log
                    .caller
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_else(|| "default".to_string()),
            ),
            (
                LOG_OUTPUT_ENV,
                self.log
                    .output_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "stdout".to_string()),
            ),
            ("ANSI", self.log.ansi.to_string()),
            (APP_NAME_ENV, self.app.name.clone()),
            (APP_VERSION_ENV, self.app.version.clone()),
            (APP_ENV_ENV, self.app.env.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize env-mutating tests to avoid cross-test pollution.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        LOG_LEVEL_ENV,
        LOG_FORMAT_ENV,
        LOG_CALLER_ENV,
        LOG_OUTPUT_ENV,
        NO_COLOR_ENV,
        APP_NAME_ENV,
        APP_VERSION_ENV,
        APP_ENV_ENV,
    ];

    fn clear_env_vars() {
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
    }

    #[test]
    fn test_defaults_are_sensible() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        let cfg = load();
        assert_eq!(cfg.log, LogConfig::default());
        assert_eq!(cfg.app, AppIdentity::default());
        assert_eq!(cfg.app.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_env_vars_override_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var(LOG_LEVEL_ENV, "DEBUG");
        std::env::set_var(LOG_FORMAT_ENV, "console");
        std::env::set_var(LOG_CALLER_ENV, "never");
        std::env::set_var(LOG_OUTPUT_ENV, "/tmp/core-kit.log");
        std::env::set_var(NO_COLOR_ENV, "1");
        std::env::set_var(APP_NAME_ENV, "billing");
        std::env::set_var(APP_ENV_ENV, "staging");
        let cfg = load();
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.log.format, LogFormat::Pretty);
        assert_eq!(cfg.log.caller, Some(CallerMode::Never));
        assert_eq!(cfg.log.output_path, Some(PathBuf::from("/tmp/core-kit.log")));
        assert!(!cfg.log.ansi);
        assert_eq!(cfg.app.name, "billing");
        assert_eq!(cfg.app.env, "staging");
        clear_env_vars();
    }

    #[test]
    fn test_invalid_env_falls_back_to_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var(LOG_LEVEL_ENV, "loud");
        std::env::set_var(LOG_FORMAT_ENV, "xml");
        std::env::set_var(LOG_CALLER_ENV, "sometimes");
        std::env::set_var(APP_NAME_ENV, "   ");
        let cfg = load();
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert!(cfg.log.caller.is_none());
        assert_eq!(cfg.app.name, "core-kit");
        clear_env_vars();
    }

    #[test]
    fn test_effective_pairs_cover_all_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        let pairs = load().effective_pairs();
        assert_eq!(pairs.len(), 8);
        assert!(pairs.contains(&(LOG_OUTPUT_ENV, "stdout".to_string())));
        assert!(pairs.contains(&(LOG_CALLER_ENV, "default".to_string())));
    }
}
