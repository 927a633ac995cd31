//! Unit tests for the Cache-Control analysis

use hcensus::analysis::cache_control::{
    known_directives, Classifier, DirectiveClass, MaxAgeValue, DEFINED_DIRECTIVES,
};
use hcensus::analysis::{Analysis, CacheControlAnalysis};
use hcensus::config::AnalysisConfig;

use crate::helpers::{analyse, cache_control_snapshot, header_set, response};

#[test]
fn end_to_end_three_responses() {
    let snap = cache_control_snapshot(&[
        response("https://a.example", Some("max-age=3600, public")),
        response("https://b.example", Some("no-cache, must-revalidate")),
        response("https://c.example", None),
    ]);

    assert_eq!(snap.headers, 2);
    assert_eq!(snap.parse_succeed, 2);
    assert_eq!(snap.directive_count("max-age"), 1);
    assert_eq!(snap.directive_count("public"), 1);
    assert_eq!(snap.directive_count("no-cache"), 1);
    assert_eq!(snap.directive_count("must-revalidate"), 1);
    assert_eq!(snap.misspellings(), 0);
    assert_eq!(snap.conflicts_fired(), 0);
    assert_eq!(snap.max_age_clash, 0);
    assert_eq!(snap.max_age_conflicting, 0);
    assert_eq!(snap.origins, 2);
}

#[test]
fn classification_is_total_and_exclusive() {
    let mut classifier = Classifier::new(0.8);
    for name in known_directives() {
        let class = classifier.classify(name);
        let expected_defined = DEFINED_DIRECTIVES.contains(&name);
        assert_eq!(class == DirectiveClass::Defined, expected_defined, "{}", name);
    }
    assert_eq!(
        classifier.classify("maxage"),
        DirectiveClass::Misspelled("max-age")
    );
    assert_eq!(
        classifier.classify("nonsensedirective"),
        DirectiveClass::Unrecognized
    );
}

#[test]
fn max_age_value_shapes() {
    let snap = cache_control_snapshot(&[
        response("o", Some("max-age=3600")),
        response("o", Some("max-age=-5")),
        response("o", Some("max-age=99999999999")),
        response("o", Some("max-age=3.5")),
        response("o", Some("max-age=banana")),
    ]);
    assert_eq!(snap.max_age.negative, 1);
    assert_eq!(snap.max_age.small.get(&-5), Some(&1));
    assert_eq!(snap.max_age.overflow, 1);
    assert_eq!(snap.max_age.decimal, 1);
    assert_eq!(snap.max_age.non_numeric, 1);
    assert_eq!(snap.max_age.non_numeric_samples[0].value, "banana");
    assert!(MaxAgeValue::Integer(3600).is_positive_integer());
}

#[test]
fn conflict_rules_fire_once_per_response() {
    let snap = cache_control_snapshot(&[response("o", Some("public, no-store"))]);
    assert_eq!(snap.rule("public conflicting").unwrap().fired, 1);
    assert_eq!(snap.rules_fired(), 1);

    let snap = cache_control_snapshot(&[response("o", Some("public, max-age=60, s-maxage=60"))]);
    assert_eq!(snap.rule("public unnecessary").unwrap().fired, 1);
    assert_eq!(snap.rules_fired(), 1);

    let snap = cache_control_snapshot(&[response("o", Some("no-cache, must-revalidate"))]);
    assert_eq!(snap.rule("must-revalidate unnecessary").unwrap().fired, 1);
    assert_eq!(snap.conflicts_fired(), 0);

    let snap = cache_control_snapshot(&[response("o", Some("private, max-age=0"))]);
    assert_eq!(snap.rules_fired(), 0);
}

#[test]
fn content_type_attribution() {
    let sets = vec![
        header_set(&[
            (":origin", "a"),
            ("cache-control", "no-store"),
            ("content-type", "application/json"),
        ]),
        header_set(&[(":origin", "a"), ("cache-control", "no-store")]),
    ];
    let snap = cache_control_snapshot(&sets);
    let types: Vec<(&str, u64)> = snap
        .content_types
        .iter()
        .map(|s| (s.value.as_str(), s.count))
        .collect();
    assert_eq!(types, vec![("application/json", 1), ("unknown", 1)]);
}

#[test]
fn configured_threshold_is_used() {
    let config = AnalysisConfig {
        similarity_threshold: 0.95,
        ..Default::default()
    };
    let mut analysis = CacheControlAnalysis::new(&config);
    analyse(&[response("o", Some("maxage=1"))], &mut analysis);
    let snap = analysis.snapshot();
    assert_eq!(snap.misspellings(), 0);
    assert_eq!(snap.unrecognized[0].name, "maxage");
}

#[test]
fn merged_workers_equal_one_pass() {
    let sets = vec![
        response("a", Some("max-age=10, no-cache")),
        response("b", Some("s-maxage=300, no-store, public")),
        response("c", Some("privte")),
        response("a", Some("max-age=\"x\"")),
    ];
    let single = cache_control_snapshot(&sets);

    let mut first = CacheControlAnalysis::default();
    let mut second = CacheControlAnalysis::default();
    analyse(&sets[..1], &mut first);
    analyse(&sets[1..], &mut second);
    first.merge(second);

    assert_eq!(first.snapshot(), single);
}
