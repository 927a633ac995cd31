//! Analyses run over dispatched header sets.
//!
//! Each analysis owns its counters, declares which headers it wants parsed,
//! and can absorb the counters of another instance of itself so that files
//! processed on separate workers combine into one report.

pub mod cache_control;
pub mod parse_stats;
pub mod unregistered;
pub mod weird_values;

pub use cache_control::{CacheControlAnalysis, CacheControlSnapshot};
pub use parse_stats::ParseStatsAnalysis;
pub use unregistered::{Registry, UnregisteredAnalysis};
pub use weird_values::WeirdValuesAnalysis;

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::ReportConfig;
use crate::dispatch::ParsedSet;

/// A per-run aggregator fed one header set at a time.
pub trait Analysis {
    /// Header names this analysis wants parsed. `None` means every header.
    fn interest(&self) -> Option<Vec<Vec<u8>>> {
        None
    }

    /// Account for one complete header set.
    fn analyse(&mut self, set: &ParsedSet<'_>);

    /// Add the counters of `other` into `self`.
    fn merge(&mut self, other: Self)
    where
        Self: Sized;

    /// Human-readable report.
    fn render_text(&self, config: &ReportConfig) -> String;

    /// Machine-readable report.
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;
}

/// Add every count of `from` into `into`.
pub(crate) fn merge_counts<K: Eq + Hash>(into: &mut HashMap<K, u64>, from: HashMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}

/// [`merge_counts`] for two-level tallies.
pub(crate) fn merge_nested<K, J>(
    into: &mut HashMap<K, HashMap<J, u64>>,
    from: HashMap<K, HashMap<J, u64>>,
) where
    K: Eq + Hash,
    J: Eq + Hash,
{
    for (key, inner) in from {
        merge_counts(into.entry(key).or_default(), inner);
    }
}

/// Entries sorted by descending count, ties by ascending key, cut to `limit`.
pub(crate) fn ranked<K: Ord + Clone>(counts: &HashMap<K, u64>, limit: usize) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);
    entries
}
