use claimcheck_common::observability::LogFormat;
use claimcheck_config::ClaimCheckConfigLoader;
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
version: "1"
backend:
  base_url: "http://factcheck.local:3000"
  check_path: "/check"
  timeout_secs: 20
logging:
  format: json
  filter: "claimcheck=debug,info"
  dir: "/tmp/claimcheck-logs"
  "#;
    let p = write_yaml(&tmp, "claimcheck.yaml", file_yaml);

    let config = ClaimCheckConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load config");

    assert_eq!(config.version.as_deref(), Some("1"));
    assert_eq!(config.backend.base_url, "http://factcheck.local:3000");
    assert_eq!(config.backend.timeout_secs, 20);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter, "claimcheck=debug,info");
    assert_eq!(
        config.logging.dir,
        Some(PathBuf::from("/tmp/claimcheck-logs"))
    );
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "claimcheck.yaml",
        "backend:\n  base_url: \"http://from-file:3000\"\n  timeout_secs: 20\n",
    );

    temp_env::with_vars(
        [
            ("CLAIMCHECK__BACKEND__BASE_URL", Some("http://from-env:9000")),
            ("CLAIMCHECK__BACKEND__TIMEOUT_SECS", Some("5")),
        ],
        || {
            let config = ClaimCheckConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.backend.base_url, "http://from-env:9000");
            assert_eq!(config.backend.timeout_secs, 5);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let absent = tmp.path().join("nope.yaml");

    let config = ClaimCheckConfigLoader::new()
        .with_optional_file(absent)
        .load()
        .expect("defaults load");

    assert_eq!(config.backend.base_url, "http://localhost:3000");
    assert_eq!(config.backend.check_path, "/check");
    assert_eq!(config.backend.timeout_secs, 15);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let absent = tmp.path().join("nope.yaml");

    let result = ClaimCheckConfigLoader::new().with_file(absent).load();
    assert!(result.is_err());
}
