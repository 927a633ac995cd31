//! Per-response dispatch of header sets to an analysis.
//!
//! The dispatcher runs every header of a [`HeaderSet`] through the
//! [`FieldParser`] and then hands the complete result to the analysis in a
//! single call, so rules spanning several headers or directives see one
//! consistent view of the response.

use serde::Serialize;
use std::collections::HashSet;

use crate::analysis::Analysis;
use crate::fields::{FieldParser, ParseOutcome};
use crate::logformat::{is_pseudo_header, latin1_to_string, HeaderSet};
use crate::sfv::{SfvError, StructuredFieldValue};

/// Run-wide header counters, used as denominators in reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchTotals {
    /// Header sets dispatched
    pub sets: u64,
    /// Headers examined, pseudo-headers excluded
    pub headers: u64,
    /// Skipped by the interest filter
    pub uninteresting: u64,
    /// Skipped as longer than the parser limit
    pub too_long: u64,
    /// Skipped as empty or whitespace
    pub empty: u64,
    /// Not a structured field; left raw
    pub unrecognised: u64,
    /// Parsed successfully
    pub parsed: u64,
    /// Failed to parse
    pub failed: u64,
}

impl DispatchTotals {
    pub fn add(&mut self, other: &DispatchTotals) {
        self.sets += other.sets;
        self.headers += other.headers;
        self.uninteresting += other.uninteresting;
        self.too_long += other.too_long;
        self.empty += other.empty;
        self.unrecognised += other.unrecognised;
        self.parsed += other.parsed;
        self.failed += other.failed;
    }
}

/// One response as seen by an analysis.
#[derive(Debug)]
pub struct ParsedSet<'a> {
    /// `:url` pseudo-header
    pub url: Option<&'a [u8]>,
    /// `:origin` pseudo-header
    pub origin: Option<&'a [u8]>,
    /// Every captured header, pseudo-headers included
    pub raw: &'a HeaderSet,
    /// Successfully parsed headers, in capture order
    pub parsed: Vec<(&'a [u8], StructuredFieldValue)>,
    /// Headers that failed to parse, in capture order
    pub errors: Vec<(&'a [u8], SfvError)>,
}

impl<'a> ParsedSet<'a> {
    pub fn parsed_value(&self, name: &[u8]) -> Option<&StructuredFieldValue> {
        self.parsed
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn error(&self, name: &[u8]) -> Option<&SfvError> {
        self.errors.iter().find(|(n, _)| *n == name).map(|(_, e)| e)
    }

    /// Origin as text, `-` when not captured.
    pub fn origin_label(&self) -> String {
        self.origin
            .map(latin1_to_string)
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Parses header sets and forwards them to an analysis.
pub struct Dispatcher {
    parser: FieldParser,
    interest: Option<HashSet<Vec<u8>>>,
    totals: DispatchTotals,
}

impl Dispatcher {
    /// Create a dispatcher. `interest` limits which headers are examined;
    /// `None` examines all of them.
    pub fn new(parser: FieldParser, interest: Option<Vec<Vec<u8>>>) -> Self {
        Self {
            parser,
            interest: interest.map(|names| names.into_iter().collect()),
            totals: DispatchTotals::default(),
        }
    }

    /// Create a dispatcher using the interest filter declared by `analysis`.
    pub fn for_analysis<A: Analysis + ?Sized>(parser: FieldParser, analysis: &A) -> Self {
        Self::new(parser, analysis.interest())
    }

    pub fn totals(&self) -> DispatchTotals {
        self.totals
    }

    pub fn parser(&self) -> &FieldParser {
        &self.parser
    }

    /// Parse every header in `set` and pass the result to `analysis`.
    pub fn dispatch<A: Analysis + ?Sized>(&mut self, set: &HeaderSet, analysis: &mut A) {
        self.totals.sets += 1;

        let mut parsed = Vec::new();
        let mut errors = Vec::new();

        for (name, value) in set.iter() {
            if is_pseudo_header(name) {
                continue;
            }
            self.totals.headers += 1;

            if let Some(interest) = &self.interest {
                if !interest.contains(name) {
                    self.totals.uninteresting += 1;
                    continue;
                }
            }

            match self.parser.parse(name, value) {
                ParseOutcome::TooLong => self.totals.too_long += 1,
                ParseOutcome::Empty => self.totals.empty += 1,
                ParseOutcome::Unrecognised => self.totals.unrecognised += 1,
                ParseOutcome::Parsed(sf) => {
                    self.totals.parsed += 1;
                    parsed.push((name, sf));
                }
                ParseOutcome::Failed(reason) => {
                    self.totals.failed += 1;
                    errors.push((name, reason));
                }
            }
        }

        let view = ParsedSet {
            url: set.url(),
            origin: set.origin(),
            raw: set,
            parsed,
            errors,
        };
        analysis.analyse(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;

    /// Records what it was handed.
    #[derive(Default)]
    struct Recorder {
        interest: Option<Vec<Vec<u8>>>,
        calls: usize,
        parsed: Vec<String>,
        errors: Vec<String>,
        origins: Vec<String>,
    }

    impl Analysis for Recorder {
        fn interest(&self) -> Option<Vec<Vec<u8>>> {
            self.interest.clone()
        }

        fn analyse(&mut self, set: &ParsedSet<'_>) {
            self.calls += 1;
            self.origins.push(set.origin_label());
            self.parsed
                .extend(set.parsed.iter().map(|(n, _)| latin1_to_string(n)));
            self.errors
                .extend(set.errors.iter().map(|(n, _)| latin1_to_string(n)));
        }

        fn merge(&mut self, other: Self) {
            self.calls += other.calls;
        }

        fn render_text(&self, _config: &ReportConfig) -> String {
            format!("{} calls", self.calls)
        }

        fn to_json(&self) -> serde_json::Result<serde_json::Value> {
            Ok(serde_json::json!({ "calls": self.calls }))
        }
    }

    fn response() -> HeaderSet {
        let mut set = HeaderSet::new();
        set.insert(&b":url"[..], &b"https://a.example/"[..]);
        set.insert(&b":origin"[..], &b"https://a.example"[..]);
        set.insert(&b"cache-control"[..], &b"max-age=60"[..]);
        set.insert(&b"content-type"[..], &b"text/html"[..]);
        set.insert(&b"age"[..], &b"not valid"[..]);
        set.insert(&b"server"[..], &b"nginx"[..]);
        set.insert(&b"vary"[..], &b"   "[..]);
        set.insert(&b"etag"[..], vec![b'x'; 300]);
        set
    }

    #[test]
    fn whole_set_is_dispatched_once() {
        let mut recorder = Recorder::default();
        let mut dispatcher = Dispatcher::for_analysis(FieldParser::default(), &recorder);
        dispatcher.dispatch(&response(), &mut recorder);

        assert_eq!(recorder.calls, 1);
        assert_eq!(recorder.parsed, vec!["cache-control", "content-type"]);
        assert_eq!(recorder.errors, vec!["age"]);
        assert_eq!(recorder.origins, vec!["https://a.example"]);

        let totals = dispatcher.totals();
        assert_eq!(totals.sets, 1);
        assert_eq!(totals.headers, 6);
        assert_eq!(totals.parsed, 2);
        assert_eq!(totals.failed, 1);
        assert_eq!(totals.unrecognised, 1);
        assert_eq!(totals.empty, 1);
        assert_eq!(totals.too_long, 1);
        assert_eq!(totals.uninteresting, 0);
    }

    #[test]
    fn interest_filter_skips_other_headers() {
        let mut recorder = Recorder {
            interest: Some(vec![b"cache-control".to_vec()]),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::for_analysis(FieldParser::default(), &recorder);
        dispatcher.dispatch(&response(), &mut recorder);

        assert_eq!(recorder.parsed, vec!["cache-control"]);
        assert!(recorder.errors.is_empty());
        assert_eq!(dispatcher.totals().uninteresting, 5);
        assert_eq!(dispatcher.totals().too_long, 0);
    }

    #[test]
    fn missing_origin_is_labelled() {
        let mut recorder = Recorder::default();
        let mut dispatcher = Dispatcher::new(FieldParser::default(), None);
        dispatcher.dispatch(&HeaderSet::new(), &mut recorder);
        assert_eq!(recorder.origins, vec!["-"]);
    }

    #[test]
    fn totals_add() {
        let mut a = DispatchTotals {
            sets: 1,
            too_long: 2,
            ..Default::default()
        };
        let b = a;
        a.add(&b);
        assert_eq!(a.sets, 2);
        assert_eq!(a.too_long, 4);
    }
}
