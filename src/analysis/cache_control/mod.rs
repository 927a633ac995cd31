//! Cache-Control directive mining
//!
//! For every response carrying a parseable `Cache-Control` dictionary this
//! analysis:
//!
//! - classifies each directive (defined, informal, request-only, a likely
//!   misspelling of a known directive, or unrecognized)
//! - attributes directives to the responding origin and Content-Type
//! - checks `max-age`/`s-maxage` values for small, overflowing, negative,
//!   decimal and non-numeric values
//! - detects redundant or contradictory directive combinations
//!
//! Counters only grow. They are read through [`CacheControlSnapshot`].

mod classify;
mod max_age;
mod rules;
mod similarity;
mod snapshot;

pub use classify::{
    known_directives, Classifier, DirectiveClass, DEFINED_DIRECTIVES, INFORMAL_DIRECTIVES,
    MAX_AGE_DIRECTIVES, REQUEST_DIRECTIVES,
};
pub use max_age::{MaxAgeValue, OVERFLOW_LIMIT};
pub use rules::{
    max_age_combination, CombinationRule, MaxAgeCombination, RuleKind, COMBINATION_RULES,
};
pub use similarity::ratio;
pub use snapshot::{rate, CacheControlSnapshot, DirectiveStat, MaxAgeStats, RuleStat, Sample};

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{merge_counts, merge_nested, ranked, Analysis};
use crate::config::{AnalysisConfig, ReportConfig};
use crate::dispatch::ParsedSet;
use crate::fields::is_blank;
use crate::sfv::{Dictionary, StructuredFieldValue};

const CACHE_CONTROL: &[u8] = b"cache-control";
const CONTENT_TYPE: &[u8] = b"content-type";
const UNKNOWN_CONTENT_TYPE: &str = "unknown";

/// Maps of every value ever seen are kept until the snapshot; the snapshot
/// itself only carries the ranked head of each.
const SNAPSHOT_SAMPLE_LIMIT: usize = 100;

type Tally = HashMap<String, u64>;
type NestedTally = HashMap<String, Tally>;

#[derive(Debug, Default)]
struct MaxAgeTally {
    headers: u64,
    directives: u64,
    small: BTreeMap<i64, u64>,
    overflow: u64,
    decimal: u64,
    negative: u64,
    non_numeric: u64,
    non_numeric_samples: Tally,
}

impl MaxAgeTally {
    fn record(&mut self, value: &MaxAgeValue, small_limit: i64) {
        self.directives += 1;
        match value {
            MaxAgeValue::Integer(v) => {
                if value.is_small(small_limit) {
                    *self.small.entry(*v).or_insert(0) += 1;
                }
                if value.is_overflow() {
                    self.overflow += 1;
                }
                if value.is_negative() {
                    self.negative += 1;
                }
            }
            MaxAgeValue::Decimal(_) => self.decimal += 1,
            MaxAgeValue::NonNumeric(text) => {
                self.non_numeric += 1;
                *self.non_numeric_samples.entry(text.clone()).or_insert(0) += 1;
            }
        }
    }

    fn merge(&mut self, other: MaxAgeTally) {
        self.headers += other.headers;
        self.directives += other.directives;
        for (value, count) in other.small {
            *self.small.entry(value).or_insert(0) += count;
        }
        self.overflow += other.overflow;
        self.decimal += other.decimal;
        self.negative += other.negative;
        self.non_numeric += other.non_numeric;
        merge_counts(&mut self.non_numeric_samples, other.non_numeric_samples);
    }

    fn stats(&self) -> MaxAgeStats {
        MaxAgeStats {
            headers: self.headers,
            directives: self.directives,
            small: self.small.clone(),
            overflow: self.overflow,
            decimal: self.decimal,
            negative: self.negative,
            non_numeric: self.non_numeric,
            non_numeric_samples: Sample::from_ranked(ranked(
                &self.non_numeric_samples,
                SNAPSHOT_SAMPLE_LIMIT,
            )),
        }
    }
}

/// Per-run Cache-Control aggregator.
pub struct CacheControlAnalysis {
    classifier: Classifier,
    small_max_age: i64,

    header_sets: u64,
    parse_succeed: u64,
    parse_fail: u64,
    too_long: u64,
    empty: u64,

    directive_count: u64,
    defined: Tally,
    informal: Tally,
    request: Tally,
    unrecognized: Tally,
    misspelled: HashMap<&'static str, u64>,
    misspelled_samples: HashMap<&'static str, Tally>,
    misspelled_origins: HashMap<&'static str, Tally>,

    directive_origins: NestedTally,
    content_types: Tally,
    parameters: Tally,

    max_age: MaxAgeTally,
    max_age_clash: u64,
    max_age_conflicting: u64,
    rules_fired: [u64; COMBINATION_RULES.len()],
    rules_with_directive: [u64; COMBINATION_RULES.len()],
}

impl Default for CacheControlAnalysis {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl CacheControlAnalysis {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            classifier: Classifier::new(config.similarity_threshold),
            small_max_age: config.small_max_age,
            header_sets: 0,
            parse_succeed: 0,
            parse_fail: 0,
            too_long: 0,
            empty: 0,
            directive_count: 0,
            defined: HashMap::new(),
            informal: HashMap::new(),
            request: HashMap::new(),
            unrecognized: HashMap::new(),
            misspelled: HashMap::new(),
            misspelled_samples: HashMap::new(),
            misspelled_origins: HashMap::new(),
            directive_origins: HashMap::new(),
            content_types: HashMap::new(),
            parameters: HashMap::new(),
            max_age: MaxAgeTally::default(),
            max_age_clash: 0,
            max_age_conflicting: 0,
            rules_fired: [0; COMBINATION_RULES.len()],
            rules_with_directive: [0; COMBINATION_RULES.len()],
        }
    }

    fn analyse_directives(&mut self, directives: &Dictionary, origin: &str, content_type: &str) {
        let mut lifetimes = Vec::new();

        for (name, member) in directives.iter() {
            self.directive_count += 1;
            match self.directive_origins.get_mut(name) {
                Some(origins) => bump(origins, origin),
                None => {
                    let mut origins = Tally::new();
                    bump(&mut origins, origin);
                    self.directive_origins.insert(name.to_string(), origins);
                }
            }
            bump(&mut self.content_types, content_type);

            match self.classifier.classify(name) {
                DirectiveClass::Defined => bump(&mut self.defined, name),
                DirectiveClass::Informal => bump(&mut self.informal, name),
                DirectiveClass::RequestOnly => bump(&mut self.request, name),
                DirectiveClass::Unrecognized => bump(&mut self.unrecognized, name),
                DirectiveClass::Misspelled(known) => {
                    *self.misspelled.entry(known).or_insert(0) += 1;
                    bump(self.misspelled_samples.entry(known).or_default(), name);
                    bump(self.misspelled_origins.entry(known).or_default(), origin);
                }
            }

            for param in member.params().keys() {
                bump(&mut self.parameters, param);
            }

            if MAX_AGE_DIRECTIVES.contains(&name) {
                let value = MaxAgeValue::from_member(member);
                self.max_age.record(&value, self.small_max_age);
                lifetimes.push(value);
            }
        }

        if !lifetimes.is_empty() {
            self.max_age.headers += 1;
        }
        match max_age_combination(directives, &lifetimes) {
            Some(MaxAgeCombination::Conflicting) => self.max_age_conflicting += 1,
            Some(MaxAgeCombination::Clash) => self.max_age_clash += 1,
            None => {}
        }

        for (idx, rule) in COMBINATION_RULES.iter().enumerate() {
            if directives.contains_key(rule.directive) {
                self.rules_with_directive[idx] += 1;
            }
            if rule.fires(directives) {
                self.rules_fired[idx] += 1;
            }
        }
    }

    /// Distinct origins any directive was seen on.
    fn distinct_origins(&self) -> usize {
        self.directive_origins
            .values()
            .flat_map(|origins| origins.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    fn directive_stats(&self, tally: &Tally) -> Vec<DirectiveStat> {
        ranked(tally, usize::MAX)
            .into_iter()
            .map(|(name, count)| DirectiveStat {
                origins: self.directive_origins.get(&name).map_or(0, HashMap::len),
                name,
                count,
                samples: Vec::new(),
            })
            .collect()
    }

    fn misspelled_stats(&self) -> Vec<DirectiveStat> {
        ranked(&self.misspelled, usize::MAX)
            .into_iter()
            .map(|(known, count)| DirectiveStat {
                name: known.to_string(),
                count,
                origins: self.misspelled_origins.get(known).map_or(0, HashMap::len),
                samples: self
                    .misspelled_samples
                    .get(known)
                    .map(|samples| Sample::from_ranked(ranked(samples, SNAPSHOT_SAMPLE_LIMIT)))
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> CacheControlSnapshot {
        CacheControlSnapshot {
            header_sets: self.header_sets,
            headers: self.parse_succeed + self.parse_fail,
            parse_succeed: self.parse_succeed,
            parse_fail: self.parse_fail,
            too_long: self.too_long,
            empty: self.empty,
            origins: self.distinct_origins(),
            directives: self.directive_count,
            defined: self.directive_stats(&self.defined),
            informal: self.directive_stats(&self.informal),
            request: self.directive_stats(&self.request),
            misspelled: self.misspelled_stats(),
            unrecognized: self.directive_stats(&self.unrecognized),
            content_types: Sample::from_ranked(ranked(&self.content_types, usize::MAX)),
            parameters: Sample::from_ranked(ranked(&self.parameters, usize::MAX)),
            max_age: self.max_age.stats(),
            max_age_clash: self.max_age_clash,
            max_age_conflicting: self.max_age_conflicting,
            rules: COMBINATION_RULES
                .iter()
                .enumerate()
                .map(|(idx, rule)| RuleStat {
                    label: rule.label,
                    kind: rule.kind,
                    directive: rule.directive,
                    fired: self.rules_fired[idx],
                    with_directive: self.rules_with_directive[idx],
                })
                .collect(),
        }
    }
}

impl Analysis for CacheControlAnalysis {
    fn interest(&self) -> Option<Vec<Vec<u8>>> {
        Some(vec![CACHE_CONTROL.to_vec(), CONTENT_TYPE.to_vec()])
    }

    fn analyse(&mut self, set: &ParsedSet<'_>) {
        self.header_sets += 1;

        if set.error(CACHE_CONTROL).is_some() {
            self.parse_fail += 1;
            return;
        }
        let Some(parsed) = set.parsed_value(CACHE_CONTROL) else {
            if let Some(raw) = set.raw.get(CACHE_CONTROL) {
                if is_blank(raw) {
                    self.empty += 1;
                } else {
                    self.too_long += 1;
                }
            }
            return;
        };
        let StructuredFieldValue::Dictionary(directives) = parsed else {
            return;
        };
        self.parse_succeed += 1;

        let origin = set.origin_label();
        let content_type = content_type(set);
        self.analyse_directives(directives, &origin, &content_type);
    }

    fn merge(&mut self, other: Self) {
        self.header_sets += other.header_sets;
        self.parse_succeed += other.parse_succeed;
        self.parse_fail += other.parse_fail;
        self.too_long += other.too_long;
        self.empty += other.empty;
        self.directive_count += other.directive_count;
        merge_counts(&mut self.defined, other.defined);
        merge_counts(&mut self.informal, other.informal);
        merge_counts(&mut self.request, other.request);
        merge_counts(&mut self.unrecognized, other.unrecognized);
        merge_counts(&mut self.misspelled, other.misspelled);
        merge_nested(&mut self.misspelled_samples, other.misspelled_samples);
        merge_nested(&mut self.misspelled_origins, other.misspelled_origins);
        merge_nested(&mut self.directive_origins, other.directive_origins);
        merge_counts(&mut self.content_types, other.content_types);
        merge_counts(&mut self.parameters, other.parameters);
        self.max_age.merge(other.max_age);
        self.max_age_clash += other.max_age_clash;
        self.max_age_conflicting += other.max_age_conflicting;
        for idx in 0..COMBINATION_RULES.len() {
            self.rules_fired[idx] += other.rules_fired[idx];
            self.rules_with_directive[idx] += other.rules_with_directive[idx];
        }
    }

    fn render_text(&self, config: &ReportConfig) -> String {
        crate::report::cache_control::render(&self.snapshot(), config)
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.snapshot())
    }
}

fn bump(tally: &mut Tally, key: &str) {
    match tally.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            tally.insert(key.to_string(), 1);
        }
    }
}

/// Lowercased Content-Type of the response, `unknown` when absent or not
/// a token or string.
fn content_type(set: &ParsedSet<'_>) -> String {
    set.parsed_value(CONTENT_TYPE)
        .and_then(StructuredFieldValue::as_item)
        .and_then(|item| item.bare.as_text())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| UNKNOWN_CONTENT_TYPE.to_string())
}
