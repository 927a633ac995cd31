//! Structured field parse success rates per header name.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use super::{merge_counts, ranked, Analysis};
use crate::analysis::cache_control::Sample;
use crate::config::ReportConfig;
use crate::dispatch::ParsedSet;
use crate::logformat::latin1_to_string;

/// Per-name success and failure counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderParseStat {
    pub name: String,
    pub succeed: u64,
    pub fail: u64,
}

impl HeaderParseStat {
    /// Failure rate as a percentage.
    pub fn fail_rate(&self) -> f64 {
        crate::analysis::cache_control::rate(self.fail, self.succeed + self.fail)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseStatsSnapshot {
    pub header_sets: u64,
    /// Every name that was parsed or failed to parse, sorted by name
    pub results: Vec<HeaderParseStat>,
    /// Every header name seen, most frequent first
    pub seen: Vec<Sample>,
}

/// Counts how often each recognized header parses.
#[derive(Debug, Default)]
pub struct ParseStatsAnalysis {
    header_sets: u64,
    succeed: HashMap<String, u64>,
    fail: HashMap<String, u64>,
    seen: HashMap<String, u64>,
}

impl ParseStatsAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ParseStatsSnapshot {
        let names: BTreeSet<&String> = self.succeed.keys().chain(self.fail.keys()).collect();
        let results = names
            .into_iter()
            .map(|name| HeaderParseStat {
                name: name.clone(),
                succeed: self.succeed.get(name).copied().unwrap_or(0),
                fail: self.fail.get(name).copied().unwrap_or(0),
            })
            .collect();

        ParseStatsSnapshot {
            header_sets: self.header_sets,
            results,
            seen: Sample::from_ranked(ranked(&self.seen, usize::MAX)),
        }
    }
}

impl Analysis for ParseStatsAnalysis {
    fn analyse(&mut self, set: &ParsedSet<'_>) {
        self.header_sets += 1;
        for (name, _) in set.raw.iter() {
            *self.seen.entry(latin1_to_string(name)).or_insert(0) += 1;
        }
        for (name, _) in &set.parsed {
            *self.succeed.entry(latin1_to_string(name)).or_insert(0) += 1;
        }
        for (name, _) in &set.errors {
            *self.fail.entry(latin1_to_string(name)).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: Self) {
        self.header_sets += other.header_sets;
        merge_counts(&mut self.succeed, other.succeed);
        merge_counts(&mut self.fail, other.fail);
        merge_counts(&mut self.seen, other.seen);
    }

    fn render_text(&self, config: &ReportConfig) -> String {
        crate::report::parse_stats::render(&self.snapshot(), config)
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.snapshot())
    }
}
