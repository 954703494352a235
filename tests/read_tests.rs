//! Integration tests for reading configuration files.
//!
//! Covers both formats decoding into structs, maps, sequences and scalars,
//! plus the I/O and decode failure paths.

use config_merge::config::{GlobalConfig, Logging, read, read_as};
use config_merge::error::ReadError;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to write `content` to `name` inside a fresh temp dir.
fn write_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join(name);
    fs::write(&path, content).expect("Failed to write config file");
    (temp, path)
}

fn expected_global() -> GlobalConfig {
    GlobalConfig {
        version: "v1.0.0".into(),
        time_zone: "UTC".into(),
        logging: Some(Logging {
            logger: "glg".into(),
            level: "warn".into(),
            format: "json".into(),
        }),
    }
}

#[test]
fn test_read_json_into_struct() {
    let (_temp, path) = write_file(
        "read_config_test.json",
        r#"{
            "version": "v1.0.0",
            "time_zone": "UTC",
            "logging": {
                "logger": "glg",
                "level": "warn",
                "format": "json"
            }}"#,
    );

    let mut cfg = GlobalConfig::default();
    read(&path, &mut cfg).unwrap();
    assert_eq!(cfg, expected_global());
}

#[test]
fn test_read_yaml_into_struct() {
    let (_temp, path) = write_file(
        "read_config_test.yaml",
        "time_zone: UTC\nversion: v1.0.0\nlogging:\n  format: json\n  level: warn\n  logger: glg\n",
    );

    let mut cfg = GlobalConfig::default();
    read(&path, &mut cfg).unwrap();
    assert_eq!(cfg, expected_global());
}

#[test]
fn test_yaml_and_json_decode_identically() {
    let (_json_dir, json_path) = write_file(
        "config.json",
        r#"{"version":"v1.0.0","time_zone":"UTC","logging":{"logger":"glg","level":"warn","format":"json"}}"#,
    );
    let (_yaml_dir, yaml_path) = write_file(
        "config.yml",
        "time_zone: UTC\nversion: v1.0.0\nlogging:\n  format: json\n  level: warn\n  logger: glg",
    );

    let from_json: GlobalConfig = read_as(&json_path).unwrap();
    let from_yaml: GlobalConfig = read_as(&yaml_path).unwrap();
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_read_json_into_map() {
    let (_temp, path) = write_file(
        "read_config_test.json",
        r#"{"version": "v1.0.0", "time_zone": "UTC"}"#,
    );

    let mut cfg: HashMap<String, String> = HashMap::new();
    read(&path, &mut cfg).unwrap();
    assert_eq!(
        cfg,
        HashMap::from([
            ("version".to_string(), "v1.0.0".to_string()),
            ("time_zone".to_string(), "UTC".to_string()),
        ])
    );
}

#[test]
fn test_read_nested_map() {
    for (name, content) in [
        (
            "nested.json",
            r#"{"version": "v1.0.0", "logging": {"logger": "glg"}}"#,
        ),
        ("nested.yaml", "version: v1.0.0\nlogging:\n  logger: glg\n"),
    ] {
        let (_temp, path) = write_file(name, content);
        let cfg: HashMap<String, Value> = read_as(&path).unwrap();
        assert_eq!(cfg["version"], json!("v1.0.0"));
        assert_eq!(cfg["logging"], json!({"logger": "glg"}), "{name}");
    }
}

#[test]
fn test_read_sequence_of_maps() {
    for (name, content) in [
        (
            "slice.json",
            r#"[{"version": "v1.0.0"}, {"time_zone": "UTC", "logging": {"logger": "glg"}}]"#,
        ),
        (
            "slice.yaml",
            "- version: v1.0.0\n- time_zone: UTC\n  logging:\n    logger: glg\n",
        ),
    ] {
        let (_temp, path) = write_file(name, content);
        let cfg: Vec<HashMap<String, Value>> = read_as(&path).unwrap();
        assert_eq!(cfg.len(), 2, "{name}");
        assert_eq!(cfg[0]["version"], json!("v1.0.0"));
        assert_eq!(cfg[1]["time_zone"], json!("UTC"));
        assert_eq!(cfg[1]["logging"]["logger"], json!("glg"));
    }
}

#[test]
fn test_read_scalar() {
    let (_temp, path) = write_file("scalar.json", r#""example""#);
    let s: String = read_as(&path).unwrap();
    assert_eq!(s, "example");

    let (_temp, path) = write_file("scalar.yaml", "example\n");
    let s: String = read_as(&path).unwrap();
    assert_eq!(s, "example");
}

#[test]
fn test_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("read_test_config.yaml");

    let mut cfg = expected_global();
    let err = read(&path, &mut cfg).unwrap_err();

    assert_eq!(err.kind(), Some(io::ErrorKind::NotFound));
    assert!(err.is_not_found());
    match &err {
        ReadError::Open { path: p, source } => {
            assert_eq!(p, &path);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected open error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("open "));
    assert_eq!(cfg, expected_global());
}

#[test]
fn test_invalid_json_names_character() {
    let (_temp, path) = write_file("read_test_config.json", "timezone\n:");

    let mut cfg = GlobalConfig::default();
    let err = read(&path, &mut cfg).unwrap_err();

    assert!(err.is_decode());
    assert!(err.kind().is_none());
    assert!(matches!(err, ReadError::Json { token: Some('t'), .. }));
    let msg = err.to_string();
    assert!(msg.starts_with("invalid character 't': "), "{msg}");
    assert_eq!(cfg, GlobalConfig::default());
}

#[test]
fn test_yaml_type_error_uses_json_wording() {
    let (_temp, path) = write_file("read_test_config.yaml", "example\n");

    let mut cfg = GlobalConfig::default();
    let err = read(&path, &mut cfg).unwrap_err();

    assert!(matches!(err, ReadError::Yaml(_)));
    let msg = err.to_string();
    assert!(
        msg.starts_with("while decoding JSON: invalid type: string"),
        "{msg}"
    );
    assert!(msg.contains("GlobalConfig"), "{msg}");
    assert_eq!(cfg, GlobalConfig::default());
}

#[test]
fn test_unknown_extension_reads_as_json() {
    let (_temp, path) = write_file("config.conf", r#"{"version": "v1.0.0"}"#);
    let cfg: GlobalConfig = read_as(&path).unwrap();
    assert_eq!(cfg.version, "v1.0.0");
    assert!(cfg.logging.is_none());
}
