//! Test helper utilities

#![allow(dead_code)]

use hcensus::analysis::{Analysis, CacheControlAnalysis, CacheControlSnapshot};
use hcensus::dispatch::Dispatcher;
use hcensus::fields::FieldParser;
use hcensus::logformat::{encode_header_set, HeaderSet};

/// Build a header set from `(name, value)` pairs.
pub fn header_set(pairs: &[(&str, &str)]) -> HeaderSet {
    pairs.iter().copied().collect()
}

/// A response from `origin`, with a Cache-Control header when given.
pub fn response(origin: &str, cache_control: Option<&str>) -> HeaderSet {
    let mut set = HeaderSet::new();
    set.insert(":url", format!("{}/", origin));
    set.insert(":origin", origin);
    if let Some(value) = cache_control {
        set.insert("cache-control", value);
    }
    set
}

/// Encode header sets into the binary log format.
pub fn encode(sets: &[HeaderSet]) -> Vec<u8> {
    let mut out = Vec::new();
    for set in sets {
        out.extend(encode_header_set(set).expect("Failed to encode header set"));
    }
    out
}

/// Dispatch every set to a fresh Cache-Control analysis.
pub fn cache_control_snapshot(sets: &[HeaderSet]) -> CacheControlSnapshot {
    let mut analysis = CacheControlAnalysis::default();
    analyse(sets, &mut analysis);
    analysis.snapshot()
}

/// Dispatch every set to `analysis` with a default parser.
pub fn analyse<A: Analysis>(sets: &[HeaderSet], analysis: &mut A) {
    let mut dispatcher = Dispatcher::for_analysis(FieldParser::default(), analysis);
    for set in sets {
        dispatcher.dispatch(set, analysis);
    }
}
