use pagesum_common::observability::LogFormat;
use pagesum_config::{DEFAULT_USER_AGENT, PagesumConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
fetch:
  timeout_secs: 45
limits:
  h1: 2
  h2: 3
  nav_links: 4
logging:
  format: json
  filter: "pagesum=debug"
  emit_file: true
  dir: "/tmp/pagesum-logs"
  "#;
    let p = write_yaml(&tmp, "pagesum.yaml", file_yaml);

    let config = PagesumConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load system config");

    assert_eq!(config.fetch.timeout_secs, 45);
    assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(
        (config.limits.h1, config.limits.h2, config.limits.nav_links),
        (2, 3, 4)
    );
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter, "pagesum=debug");
    assert!(config.logging.emit_file);
    assert!(config.logging.emit_stderr);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();

    let config = PagesumConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("optional file may be absent");

    assert_eq!(config.fetch.timeout_secs, 20);
    assert_eq!(config.limits.nav_links, 30);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();

    let result = PagesumConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();

    assert!(result.is_err());
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "pagesum.yaml", "fetch:\n  timeout_secs: 45\n");

    temp_env::with_var("PAGESUM__FETCH__TIMEOUT_SECS", Some("7"), || {
        let config = PagesumConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("env overlay parses");
        assert_eq!(config.fetch.timeout_secs, 7);
    });
}
