//! Config-driven logger construction and file output.

use core_kit::fields;
use core_kit::meta;
use core_kit::telemetry::{
    install_level_bridge, install_tracing_bridge, CallerMode, LogConfig, LogError, LogFormat};

#[test]
fn test_file_output_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let cfg = LogConfig {
        output_path: Some(path.clone()),
        ..LogConfig::default()
    };

    let logger = cfg.build(None).unwrap();
    logger.info("first", &[]);
    logger.warn("second", &[&fields! { "attempt" => 2 }]);
    drop(logger);

    // A second logger on the same path appends rather than truncates.
    cfg.build(None).unwrap().info("third", &[]);

    let text = std::fs::read_to_string(&path).unwrap();
    let messages: Vec<String> = text
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .map(|v| v["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(messages, ["first", "second", "third"]);
}

#[test]
fn test_toml_config_with_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dev.log");
    let toml = format!(
        "[log]\nlevel = \"debug\"\nformat = \"console\"\nansi = false\noutput_path = {:?}\n",
        path.display().to_string()
    );
    let cfg = LogConfig::from_toml_str(&toml).unwrap();
    assert_eq!(cfg.format, LogFormat::Pretty);

    let metas = meta::discover("toml-app", "2.0.0", "ci").expect("metadata");
    let logger = cfg.build(Some(&metas)).unwrap();
    assert_eq!(logger.caller_mode(), CallerMode::Always);
    logger.debug("from toml", &[]);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(" DBG config_output_test.rs:"), "got {}", text);
    assert!(text.contains("from toml"));
    assert!(text.contains("app_name=toml-app"));
    assert!(!text.contains('\x1b'));
}

#[test]
fn test_bridge_requires_initialized_logger() {
    // This binary never calls `init`.
    assert!(matches!(
        install_tracing_bridge("info"),
        Err(LogError::NotInitialized)
    ));
    assert!(matches!(install_level_bridge(), Err(LogError::NotInitialized)));
}
