//! Directive taxonomy.

use serde::Serialize;

use super::similarity;
use crate::fields::LruCache;

/// Response directives defined by HTTP caching and its extensions.
pub const DEFINED_DIRECTIVES: &[&str] = &[
    "max-age",
    "s-maxage",
    "public",
    "private",
    "no-store",
    "no-cache",
    "must-revalidate",
    "no-transform",
    "proxy-revalidate",
    "stale-if-error",
    "stale-while-revalidate",
    "immutable",
];

/// Widely deployed but never standardized.
pub const INFORMAL_DIRECTIVES: &[&str] = &["pre-check", "post-check"];

/// Only meaningful in requests.
pub const REQUEST_DIRECTIVES: &[&str] = &["max-stale", "min-fresh", "only-if-cached"];

/// Directives carrying a freshness lifetime.
pub const MAX_AGE_DIRECTIVES: &[&str] = &["max-age", "s-maxage"];

const SIMILARITY_MEMO_CAPACITY: usize = 1 << 12;

/// Class of one directive occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "class", content = "name", rename_all = "snake_case")]
pub enum DirectiveClass {
    Defined,
    Informal,
    RequestOnly,
    /// Close enough to this known directive to be a typo of it
    Misspelled(&'static str),
    Unrecognized,
}

/// Known directives in the order candidates are tried for misspellings.
pub fn known_directives() -> impl Iterator<Item = &'static str> {
    DEFINED_DIRECTIVES
        .iter()
        .chain(REQUEST_DIRECTIVES)
        .chain(INFORMAL_DIRECTIVES)
        .copied()
}

/// Assigns a [`DirectiveClass`] to directive names.
///
/// Lookups of unknown names run a similarity search against every known
/// directive; its answers are memoized.
pub struct Classifier {
    threshold: f64,
    memo: LruCache<String, Option<&'static str>>,
}

impl Classifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            memo: LruCache::new(SIMILARITY_MEMO_CAPACITY),
        }
    }

    pub fn classify(&mut self, name: &str) -> DirectiveClass {
        if DEFINED_DIRECTIVES.contains(&name) {
            DirectiveClass::Defined
        } else if INFORMAL_DIRECTIVES.contains(&name) {
            DirectiveClass::Informal
        } else if REQUEST_DIRECTIVES.contains(&name) {
            DirectiveClass::RequestOnly
        } else {
            match self.similar(name) {
                Some(known) => DirectiveClass::Misspelled(known),
                None => DirectiveClass::Unrecognized,
            }
        }
    }

    /// The most similar known directive scoring strictly above the
    /// threshold. The first candidate wins ties.
    fn similar(&mut self, name: &str) -> Option<&'static str> {
        let key = name.to_string();
        if let Some(cached) = self.memo.get(&key) {
            return *cached;
        }

        let mut best: Option<(&'static str, f64)> = None;
        for known in known_directives() {
            let score = similarity::ratio(known, name);
            if score > self.threshold && best.map_or(true, |(_, top)| score > top) {
                best = Some((known, score));
            }
        }

        let found = best.map(|(known, _)| known);
        self.memo.insert(key, found);
        found
    }
}
