//! File-based configuration loading.

use std::io::Write;

use gtmdash_runtime::{ConfigError, DashboardConfig};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn toml_file_overrides_selected_fields() {
    let file = write_temp(
        ".toml",
        "poll_interval_ms = 45000\nsidebar_default_share = 20.0\nrequest_timeout_ms = 5000\n",
    );
    let config = DashboardConfig::from_toml_file(file.path()).expect("load toml");
    assert_eq!(config.poll_interval_ms, 45_000);
    assert_eq!(config.sidebar_default_share, 20.0);
    assert_eq!(config.request_timeout_ms, Some(5_000));
    assert_eq!(config.default_share, 66.67);
    assert!(config.validate().is_empty());
}

#[test]
fn json_file_round_trips_defaults() {
    let json = serde_json::to_string_pretty(&DashboardConfig::default()).expect("serialize");
    let file = write_temp(".json", &json);
    let config = DashboardConfig::from_json_file(file.path()).expect("load json");
    assert_eq!(config, DashboardConfig::default());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = DashboardConfig::from_toml_file(dir.path().join("absent.toml"))
        .expect_err("missing file");
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn loaded_values_still_need_validation() {
    let file = write_temp(".toml", "min_share = 85.0\n");
    let config = DashboardConfig::from_toml_file(file.path()).expect("parses fine");
    assert!(matches!(config.validated(), Err(ConfigError::Validation(_))));
}
