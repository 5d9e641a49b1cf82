//! core-kit-log entry point.
//!
//! Initializes the process-wide logger once from environment and flags, then
//! emits a sample record. Useful for checking how a deployment's log lines look.
//!
//! ## CLI Subcommands
//!
//! - `core-kit-log` or `core-kit-log log [MESSAGE...]` - Emit one info record
//! - `core-kit-log meta` - Print discovered metadata as JSON
//! - `core-kit-log config` - Print effective configuration

use std::process::ExitCode;

use core_kit::config::{self as kit_config, EnvConfig};
use core_kit::telemetry::{self, LogConfig, LogFormat};
use core_kit::{fields, meta};

fn main() -> ExitCode {
    meta::mark_process_start();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("log");

    match command {
        "log" => run_log(&args[2.min(args.len())..]),
        "meta" => run_meta(),
        "config" => {
            for (key, value) in kit_config::load().effective_pairs() {
                println!("{}={}", key, value);
            }
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "-V" => {
            println!("core-kit-log {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => run_log(&args[1..]),
    }
}

/// Flags accepted by `log`.
struct LogArgs {
    level: Option<String>,
    dev: bool,
    config_path: Option<String>,
    message: String,
}

fn parse_log_args(args: &[String]) -> Result<LogArgs, String> {
    let mut parsed = LogArgs {
        level: None,
        dev: false,
        config_path: None,
        message: String::new(),
    };
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--level" => {
                parsed.level = Some(iter.next().ok_or("--level requires a value")?.clone());
            }
            "--config" => {
                parsed.config_path = Some(iter.next().ok_or("--config requires a path")?.clone());
            }
            "--dev" => parsed.dev = true,
            other if other.starts_with("--") => return Err(format!("Unknown flag: {}", other)),
            word => words.push(word),
        }
    }
    parsed.message = if words.is_empty() {
        "system test".to_string()
    } else {
        words.join(" ")
    };
    Ok(parsed)
}

/// Resolve config: file first, then environment, then flags.
fn resolve_config(args: &LogArgs, env: &EnvConfig) -> Result<LogConfig, String> {
    let mut cfg = match &args.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path, e))?;
            LogConfig::from_toml_str(&text).map_err(|e| e.to_string())?
        }
        None => env.log.clone(),
    };
    if let Some(level) = &args.level {
        cfg.level = level.clone();
    }
    if args.dev {
        cfg.format = LogFormat::Pretty;
    }
    Ok(cfg)
}

fn run_log(args: &[String]) -> ExitCode {
    let parsed = match parse_log_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            return ExitCode::from(2u8);
        }
    };

    let env = kit_config::load();
    let cfg = match resolve_config(&parsed, &env) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2u8);
        }
    };

    let metadata = meta::discover(&env.app.name, &env.app.version, &env.app.env);
    if let Err(e) = telemetry::init_logging(&cfg, metadata.as_ref()) {
        eprintln!("Configuration error: {}", e);
        return ExitCode::from(2u8);
    }
    if let Err(e) = telemetry::install_level_bridge() {
        eprintln!("tracing bridge disabled: {}", e);
    }

    telemetry::info(&parsed.message, &[&fields! { "data" => "xxx" }]);
    tracing::debug!(config = ?cfg.format, "sample record written");
    ExitCode::SUCCESS
}

fn run_meta() -> ExitCode {
    let env = kit_config::load();
    let Some(metadata) = meta::discover(&env.app.name, &env.app.version, &env.app.env) else {
        eprintln!("Metadata unavailable: process start time unreadable");
        return ExitCode::FAILURE;
    };
    match serde_json::to_string_pretty(&metadata) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to encode metadata: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "core-kit-log v{}

USAGE:
    core-kit-log [COMMAND] [OPTIONS] [MESSAGE...]

COMMANDS:
    log          Emit one info record (default)
    meta         Print discovered runtime metadata as JSON
    config       Print effective configuration
    version      Show version information
    help         Show this help message

OPTIONS (log):
    --level L      Minimum level (trace, debug, info, warn, error, fatal, panic)
    --dev          Human-readable console output
    --config FILE  Read the [log] table from a TOML file

ENVIRONMENT:
    CORE_KIT_LOG_LEVEL    Minimum level (default: info)
    CORE_KIT_LOG_FORMAT   json or console (default: json)
    CORE_KIT_LOG_CALLER   never, debug or always
    CORE_KIT_LOG_OUTPUT   Append records to this file instead of stdout
    CORE_KIT_APP_NAME     Application name for metadata
    CORE_KIT_APP_VERSION  Application version for metadata
    CORE_KIT_ENV          Environment label for metadata
    POD_NAME, POD_NAMESPACE, NODE_NAME  Deployment placement

EXIT CODES:
    0  Success
    1  Failure
    2  Configuration error",
        version
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kit::config::AppIdentity;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn env_with(level: &str, format: LogFormat) -> EnvConfig {
        EnvConfig {
            log: LogConfig {
                level: level.to_string(),
                format,
                ..LogConfig::default()
            },
            app: AppIdentity::default(),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_log_args(&[]).unwrap();
        assert_eq!(parsed.message, "system test");
        assert!(parsed.level.is_none());
        assert!(parsed.config_path.is_none());
        assert!(!parsed.dev);
    }

    #[test]
    fn test_parse_flags_and_message() {
        let parsed =
            parse_log_args(&args(&["--level", "debug", "hello", "--dev", "world"])).unwrap();
        assert_eq!(parsed.level.as_deref(), Some("debug"));
        assert!(parsed.dev);
        assert_eq!(parsed.message, "hello world");
    }

    #[test]
    fn test_parse_missing_values() {
        let err = parse_log_args(&args(&["--level"])).err().unwrap();
        assert!(err.contains("--level requires a value"));
        let err = parse_log_args(&args(&["--config"])).err().unwrap();
        assert!(err.contains("--config requires a path"));
    }

    #[test]
    fn test_parse_unknown_flag() {
        let err = parse_log_args(&args(&["--verbose"])).err().unwrap();
        assert_eq!(err, "Unknown flag: --verbose");
    }

    #[test]
    fn test_resolve_env_then_flags() {
        let env = env_with("warn", LogFormat::Json);

        let cfg = resolve_config(&parse_log_args(&[]).unwrap(), &env).unwrap();
        assert_eq!(cfg.level, "warn");
        assert_eq!(cfg.format, LogFormat::Json);

        let parsed = parse_log_args(&args(&["--level", "trace", "--dev"])).unwrap();
        let cfg = resolve_config(&parsed, &env).unwrap();
        assert_eq!(cfg.level, "trace");
        assert_eq!(cfg.format, LogFormat::Pretty);
    }

    #[test]
    fn test_resolve_file_replaces_env_and_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.toml");
        std::fs::write(&path, "[log]\nlevel = \"error\"\nformat = \"console\"\n").unwrap();
        let path = path.display().to_string();
        let env = env_with("warn", LogFormat::Json);

        let parsed = parse_log_args(&args(&["--config", &path])).unwrap();
        let cfg = resolve_config(&parsed, &env).unwrap();
        assert_eq!(cfg.level, "error");
        assert_eq!(cfg.format, LogFormat::Pretty);

        let parsed = parse_log_args(&args(&["--config", &path, "--level", "debug"])).unwrap();
        let cfg = resolve_config(&parsed, &env).unwrap();
        assert_eq!(cfg.level, "debug");
    }

    #[test]
    fn test_resolve_unreadable_file() {
        let parsed = parse_log_args(&args(&["--config", "/nonexistent/core-kit.toml"])).unwrap();
        let err = resolve_config(&parsed, &env_with("info", LogFormat::Json)).unwrap_err();
        assert!(err.starts_with("Failed to read /nonexistent/core-kit.toml"));
    }
}
