//! Test helper utilities

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use hcensus::logformat::{write_header_set, HeaderSet};

/// A response from `origin` carrying the given extra headers.
pub fn response(origin: &str, headers: &[(&str, &str)]) -> HeaderSet {
    let mut set = HeaderSet::new();
    set.insert(":url", format!("{}/", origin));
    set.insert(":origin", origin);
    for (name, value) in headers {
        set.insert(*name, *value);
    }
    set
}

fn encode(sets: &[HeaderSet]) -> Vec<u8> {
    let mut out = Vec::new();
    for set in sets {
        write_header_set(&mut out, set).expect("Failed to encode header set");
    }
    out
}

/// Write `sets` to `dir/name` as a plain log.
pub fn write_log(dir: &Path, name: &str, sets: &[HeaderSet]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, encode(sets)).expect("Failed to write log");
    path
}

/// Write `sets` to `dir/name` as a gzip-compressed log.
pub fn write_gzip_log(dir: &Path, name: &str, sets: &[HeaderSet]) -> PathBuf {
    let path = dir.join(name);
    let file = fs::File::create(&path).expect("Failed to create log");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(&encode(sets))
        .expect("Failed to compress log");
    encoder.finish().expect("Failed to finish gzip stream");
    path
}

/// The three-response corpus used across report tests.
pub fn sample_corpus() -> Vec<HeaderSet> {
    vec![
        response(
            "https://a.example",
            &[
                ("cache-control", "max-age=3600, public"),
                ("content-type", "text/html"),
            ],
        ),
        response(
            "https://b.example",
            &[("cache-control", "no-cache, must-revalidate")],
        ),
        response("https://c.example", &[("x-custom", "1")]),
    ]
}
