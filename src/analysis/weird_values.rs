//! Raw values of one header that failed to parse, grouped by reason.

use serde::Serialize;
use std::collections::HashMap;

use super::{merge_nested, ranked, Analysis};
use crate::analysis::cache_control::Sample;
use crate::config::ReportConfig;
use crate::dispatch::ParsedSet;
use crate::logformat::latin1_to_string;

/// Values that failed for one reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureGroup {
    pub reason: String,
    pub total: u64,
    pub values: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeirdValuesSnapshot {
    pub field: String,
    /// Most frequent reason first
    pub groups: Vec<FailureGroup>,
}

/// Collects unparseable values of a single header.
#[derive(Debug)]
pub struct WeirdValuesAnalysis {
    field: Vec<u8>,
    failures: HashMap<String, HashMap<String, u64>>,
}

impl WeirdValuesAnalysis {
    /// `field` is matched case-insensitively.
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_ascii_lowercase().into_bytes(),
            failures: HashMap::new(),
        }
    }

    pub fn snapshot(&self, limit: usize) -> WeirdValuesSnapshot {
        let mut groups: Vec<FailureGroup> = self
            .failures
            .iter()
            .map(|(reason, values)| FailureGroup {
                reason: reason.clone(),
                total: values.values().sum(),
                values: Sample::from_ranked(ranked(values, limit)),
            })
            .collect();
        groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.reason.cmp(&b.reason)));

        WeirdValuesSnapshot {
            field: latin1_to_string(&self.field),
            groups,
        }
    }
}

impl Analysis for WeirdValuesAnalysis {
    fn interest(&self) -> Option<Vec<Vec<u8>>> {
        Some(vec![self.field.clone()])
    }

    fn analyse(&mut self, set: &ParsedSet<'_>) {
        let Some(reason) = set.error(&self.field) else {
            return;
        };
        let Some(raw) = set.raw.get(&self.field) else {
            return;
        };
        *self
            .failures
            .entry(reason.to_string())
            .or_default()
            .entry(latin1_to_string(raw))
            .or_insert(0) += 1;
    }

    fn merge(&mut self, other: Self) {
        merge_nested(&mut self.failures, other.failures);
    }

    fn render_text(&self, config: &ReportConfig) -> String {
        crate::report::weird_values::render(&self.snapshot(config.top_samples))
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.snapshot(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::fields::FieldParser;
    use crate::logformat::HeaderSet;

    #[test]
    fn groups_failures_by_reason() {
        let mut analysis = WeirdValuesAnalysis::new("Cache-Control");
        let mut dispatcher = Dispatcher::for_analysis(FieldParser::default(), &analysis);
        for value in ["Max-Age=1", "Public", "Public", "max-age=1", "a=\"x"] {
            let set: HeaderSet = [("cache-control", value)].into_iter().collect();
            dispatcher.dispatch(&set, &mut analysis);
        }

        let snap = analysis.snapshot(10);
        assert_eq!(snap.field, "cache-control");
        assert_eq!(snap.groups.len(), 2);

        let first = &snap.groups[0];
        assert_eq!(first.total, 3);
        assert_eq!(first.values[0].value, "Public");
        assert_eq!(first.values[0].count, 2);
        assert_eq!(first.values[1].value, "Max-Age=1");
        assert_eq!(snap.groups[1].total, 1);
    }

    #[test]
    fn other_headers_are_not_parsed() {
        let analysis = WeirdValuesAnalysis::new("age");
        assert_eq!(analysis.interest(), Some(vec![b"age".to_vec()]));
    }

    #[test]
    fn limit_applies_per_reason() {
        let mut analysis = WeirdValuesAnalysis::new("age");
        let mut dispatcher = Dispatcher::for_analysis(FieldParser::default(), &analysis);
        for value in ["a b", "c d", "e f"] {
            let set: HeaderSet = [("age", value)].into_iter().collect();
            dispatcher.dispatch(&set, &mut analysis);
        }
        let snap = analysis.snapshot(2);
        assert_eq!(snap.groups[0].total, 3);
        assert_eq!(snap.groups[0].values.len(), 2);
    }
}
