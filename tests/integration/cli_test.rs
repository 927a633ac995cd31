//! CLI behaviour tests
//!
//! Runs the built binary against logs written into a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use crate::helpers::{response, sample_corpus, write_gzip_log, write_log};

fn hcensus(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hcensus").expect("hcensus binary is built");
    cmd.env("HOME", home.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn cache_control_report_is_the_default() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path(), "headers.bin", &sample_corpus());

    hcensus(&temp)
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("* Total header sets: 3"))
        .stdout(predicate::str::contains("2 Cache-Control headers total"))
        .stdout(predicate::str::contains("1 public unnecessary"))
        .stderr(predicate::str::contains("Pass complete"));
}

#[test]
fn gzip_logs_are_detected() {
    let temp = TempDir::new().unwrap();
    let log = write_gzip_log(temp.path(), "headers.bin.gz", &sample_corpus());

    hcensus(&temp)
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("* Total header sets: 3"));
}

#[test]
fn json_output_carries_run_summary_and_report() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path(), "headers.bin", &sample_corpus());

    let output = hcensus(&temp)
        .args(["--format", "json", "-q"])
        .arg(&log)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["run"]["sets"], 3);
    assert_eq!(json["run"]["interrupted"], false);
    assert_eq!(json["report"]["header_sets"], 3);
    assert_eq!(json["report"]["parse_succeed"], 2);
}

#[test]
fn parse_stats_report() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path(), "headers.bin", &sample_corpus());

    hcensus(&temp)
        .args(["--report", "parse-stats"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("* Requests: 3"))
        .stdout(predicate::str::contains("cache-control"));
}

#[test]
fn weird_values_requires_field() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path(), "headers.bin", &sample_corpus());

    hcensus(&temp)
        .args(["--report", "weird-values"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--field"));
}

#[test]
fn weird_values_groups_failures() {
    let temp = TempDir::new().unwrap();
    let sets = vec![
        response("https://a.example", &[("cache-control", "max-age=60,")]),
        response("https://b.example", &[("cache-control", "max-age=60,")]),
    ];
    let log = write_log(temp.path(), "headers.bin", &sets);

    hcensus(&temp)
        .args(["--report", "weird-values", "--field", "Cache-Control"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Trailing comma at end of value (2)"))
        .stdout(predicate::str::contains("2: max-age=60,"));
}

#[test]
fn unregistered_report_reads_registry() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path(), "headers.bin", &sample_corpus());
    let registry = temp.path().join("registry.txt");
    fs::write(&registry, "# registered names\ncache-control\nContent-Type\n").unwrap();

    hcensus(&temp)
        .args(["--report", "unregistered", "--registry"])
        .arg(&registry)
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("* Top Unregistered Headers Seen"))
        .stdout(predicate::str::contains("x-custom 1"))
        .stdout(predicate::str::contains("content-type").not());
}

#[test]
fn missing_log_fails() {
    let temp = TempDir::new().unwrap();

    hcensus(&temp)
        .arg(temp.path().join("missing.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open log file"));
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path(), "headers.bin", &sample_corpus());
    let config = temp.path().join("config.toml");
    fs::write(&config, "[reader]\nchunk_size = 0\n").unwrap();

    hcensus(&temp)
        .arg("--config")
        .arg(&config)
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();

    hcensus(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "hcensus {}",
            env!("CARGO_PKG_VERSION")
        )));
}
