//! Redundant and contradictory directive combinations.

use serde::Serialize;

use super::max_age::MaxAgeValue;
use crate::sfv::Dictionary;

/// Whether a combination is merely redundant or contradicts itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Unnecessary,
    Conflicting,
}

/// A directive that is pointless or contradictory next to any of `with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombinationRule {
    pub label: &'static str,
    pub kind: RuleKind,
    pub directive: &'static str,
    pub with: &'static [&'static str],
}

impl CombinationRule {
    pub fn fires(&self, directives: &Dictionary) -> bool {
        directives.contains_key(self.directive)
            && self.with.iter().any(|other| directives.contains_key(other))
    }
}

pub const COMBINATION_RULES: [CombinationRule; 4] = [
    CombinationRule {
        label: "public unnecessary",
        kind: RuleKind::Unnecessary,
        directive: "public",
        with: &["max-age", "s-maxage"],
    },
    CombinationRule {
        label: "public conflicting",
        kind: RuleKind::Conflicting,
        directive: "public",
        with: &["no-cache", "no-store"],
    },
    CombinationRule {
        label: "must-revalidate unnecessary",
        kind: RuleKind::Unnecessary,
        directive: "must-revalidate",
        with: &["no-cache", "no-store"],
    },
    CombinationRule {
        label: "must-revalidate conflicting",
        kind: RuleKind::Conflicting,
        directive: "must-revalidate",
        with: &["stale-while-revalidate", "stale-if-error"],
    },
];

/// Directives that forbid reuse and so contradict a freshness lifetime.
const MAX_AGE_CLASHES: &[&str] = &["no-cache", "no-store"];

/// How freshness lifetimes interact with `no-cache` or `no-store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxAgeCombination {
    /// A positive lifetime is given alongside
    Conflicting,
    /// A lifetime is present but grants no freshness
    Clash,
}

/// Judge a header set given every lifetime value it carries.
pub fn max_age_combination(
    directives: &Dictionary,
    values: &[MaxAgeValue],
) -> Option<MaxAgeCombination> {
    if values.is_empty() || !MAX_AGE_CLASHES.iter().any(|d| directives.contains_key(d)) {
        return None;
    }
    if values.iter().any(MaxAgeValue::is_positive_integer) {
        Some(MaxAgeCombination::Conflicting)
    } else {
        Some(MaxAgeCombination::Clash)
    }
}
