//! Unit tests for configuration loading

use hcensus::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn full_file_round_trips_through_toml() {
    let mut config = Config::default();
    config.report.top_directives = 5;
    config.analysis.small_max_age = 10;
    let text = toml::to_string(&config).unwrap();

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, text).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.report.top_directives, 5);
    assert_eq!(loaded.analysis.small_max_age, 10);
    assert_eq!(loaded.reader.chunk_size, config.reader.chunk_size);
}

#[test]
fn resolve_prefers_explicit_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[progress]\ntick = 0\n").unwrap();

    let config = Config::resolve(Some(&path)).unwrap();
    assert_eq!(config.progress.tick, 0);
}

#[test]
fn malformed_toml_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[reader\nchunk_size = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn unknown_sections_are_ignored() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[future]\nsetting = true\n").unwrap();

    assert!(Config::load_from(&path).is_ok());
}
