//! Read-only view of the Cache-Control counters.

use serde::Serialize;
use std::collections::BTreeMap;

use super::rules::RuleKind;

/// A value and how often it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub value: String,
    pub count: u64,
}

impl Sample {
    pub(crate) fn from_ranked(ranked: Vec<(String, u64)>) -> Vec<Sample> {
        ranked
            .into_iter()
            .map(|(value, count)| Sample { value, count })
            .collect()
    }
}

/// Usage of one directive name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveStat {
    pub name: String,
    pub count: u64,
    /// Distinct origins the directive was seen on
    pub origins: usize,
    /// Literal spellings, for misspelled directives only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Sample>,
}

/// Numeric sanity of `max-age` and `s-maxage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaxAgeStats {
    /// Header sets carrying at least one lifetime directive
    pub headers: u64,
    /// Lifetime directive occurrences
    pub directives: u64,
    /// Integer values of small magnitude, keyed by value
    pub small: BTreeMap<i64, u64>,
    pub overflow: u64,
    pub decimal: u64,
    pub negative: u64,
    pub non_numeric: u64,
    pub non_numeric_samples: Vec<Sample>,
}

/// How often a combination rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStat {
    pub label: &'static str,
    pub kind: RuleKind,
    pub directive: &'static str,
    pub fired: u64,
    /// Header sets carrying the rule's directive
    pub with_directive: u64,
}

/// Everything the Cache-Control analysis has counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheControlSnapshot {
    pub header_sets: u64,
    /// Parsed plus failed
    pub headers: u64,
    pub parse_succeed: u64,
    pub parse_fail: u64,
    pub too_long: u64,
    pub empty: u64,
    pub origins: usize,
    pub directives: u64,
    pub defined: Vec<DirectiveStat>,
    pub informal: Vec<DirectiveStat>,
    pub request: Vec<DirectiveStat>,
    pub misspelled: Vec<DirectiveStat>,
    pub unrecognized: Vec<DirectiveStat>,
    /// Directive occurrences per response Content-Type
    pub content_types: Vec<Sample>,
    pub parameters: Vec<Sample>,
    pub max_age: MaxAgeStats,
    /// Lifetime present with no-cache/no-store, granting no freshness
    pub max_age_clash: u64,
    /// Positive lifetime present with no-cache/no-store
    pub max_age_conflicting: u64,
    pub rules: Vec<RuleStat>,
}

impl CacheControlSnapshot {
    /// Percentage of failed parses.
    pub fn failure_rate(&self) -> f64 {
        rate(self.parse_fail, self.headers)
    }

    pub fn misspellings(&self) -> u64 {
        self.misspelled.iter().map(|d| d.count).sum()
    }

    pub fn rules_fired(&self) -> u64 {
        self.rules.iter().map(|r| r.fired).sum()
    }

    /// Firings of rules whose directives contradict each other.
    pub fn conflicts_fired(&self) -> u64 {
        self.rules
            .iter()
            .filter(|r| r.kind == RuleKind::Conflicting)
            .map(|r| r.fired)
            .sum()
    }

    /// Occurrences of exactly this directive name. Misspellings of it are
    /// not included; see [`Self::misspelled`].
    pub fn directive_count(&self, name: &str) -> u64 {
        [&self.defined, &self.informal, &self.request, &self.unrecognized]
        .into_iter()
        .flatten()
        .filter(|d| d.name == name)
        .map(|d| d.count)
        .sum()
    }

    pub fn rule(&self, label: &str) -> Option<&RuleStat> {
        self.rules.iter().find(|r| r.label == label)
    }
}

/// `part` as a percentage of `whole`; zero when `whole` is zero.
pub fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
