//! Multi-file pipeline tests

use hcensus::analysis::{CacheControlAnalysis, ParseStatsAnalysis};
use hcensus::pipeline::run_files;
use hcensus::{Config, InterruptGuard};
use tempfile::TempDir;

use crate::helpers::{response, sample_corpus, write_gzip_log, write_log};

#[test]
fn mixed_plain_and_gzip_logs_are_merged() {
    let temp = TempDir::new().unwrap();
    let paths = vec![
        write_log(temp.path(), "a.bin", &sample_corpus()),
        write_gzip_log(temp.path(), "b.bin.gz", &sample_corpus()),
        write_log(temp.path(), "c.bin", &sample_corpus()),
    ];

    let config = Config::default();
    let (analysis, summary) = run_files(&paths, Some(2), &config, &InterruptGuard::new(), || {
        CacheControlAnalysis::new(&config.analysis)
    })
    .unwrap();

    assert_eq!(summary.files, 3);
    assert_eq!(summary.sets, 9);
    assert!(!summary.interrupted);
    let snap = analysis.snapshot();
    assert_eq!(snap.header_sets, 9);
    assert_eq!(snap.headers, 6);
    assert_eq!(snap.rule("public unnecessary").unwrap().fired, 3);
}

#[test]
fn job_count_does_not_change_results() {
    let temp = TempDir::new().unwrap();
    let paths: Vec<_> = (0..4)
        .map(|i| {
            let origin = format!("https://{}.example", i);
            let sets = vec![
                response(&origin, &[("cache-control", "max-age=5")]),
                response(&origin, &[("age", "3"), ("cache-control", "privte")]),
            ];
            write_log(temp.path(), &format!("{}.bin", i), &sets)
        })
        .collect();

    let config = Config::default();
    let guard = InterruptGuard::new();
    let (one, _) = run_files(&paths, Some(1), &config, &guard, ParseStatsAnalysis::new).unwrap();
    let (four, _) = run_files(&paths, Some(4), &config, &guard, ParseStatsAnalysis::new).unwrap();
    assert_eq!(one.snapshot(), four.snapshot());
}

#[test]
fn interrupted_run_reports_partial_summary() {
    let temp = TempDir::new().unwrap();
    let paths = vec![write_log(temp.path(), "a.bin", &sample_corpus())];

    let guard = InterruptGuard::new();
    guard.interrupt();
    let (_, summary) =
        run_files(&paths, None, &Config::default(), &guard, ParseStatsAnalysis::new).unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.sets, 0);
}
