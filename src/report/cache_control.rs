//! Text rendering of the Cache-Control snapshot.

use super::{percent, width};
use crate::analysis::cache_control::{rate, CacheControlSnapshot, DirectiveStat};
use crate::config::ReportConfig;

pub fn render(snap: &CacheControlSnapshot, config: &ReportConfig) -> String {
    let mut out = String::new();
    let hw = width(snap.headers.max(snap.header_sets));

    out.push_str(&format!("* Total header sets: {}\n", snap.header_sets));
    out.push_str("* Cache-Control Headers\n");
    out.push_str(&format!(
        "  {:>hw$} Cache-Control headers total\n",
        snap.headers
    ));
    out.push_str(&format!(
        "  {:>hw$} headers successfully parsed\n",
        snap.parse_succeed
    ));
    out.push_str(&format!("  {:>hw$} headers failed parsing\n", snap.parse_fail));
    out.push_str(&format!(
        "  {:>hw$} headers had values that were too long to be reliable\n",
        snap.too_long
    ));
    out.push_str(&format!("  {:>hw$} headers had empty values\n", snap.empty));
    out.push_str(&format!("  {} failed to parse\n", percent(snap.failure_rate())));
    out.push_str(&format!("  {:>hw$} total origins\n\n", snap.origins));

    let dw = width(snap.directives);
    out.push_str("* Cache Directives\n");
    out.push_str(&format!(
        "  {:>dw$} cache directives total\n\n",
        snap.directives
    ));

    let sections = [
        ("Defined Response Directives", &snap.defined),
        ("Informal Directives", &snap.informal),
        ("Request Directives", &snap.request),
        ("Misspelled Directives", &snap.misspelled),
        ("Unrecognised Directives", &snap.unrecognized),
    ];
    for (title, stats) in sections {
        summarise(&mut out, title, stats, snap, config, dw);
    }

    out.push_str(&heading(
        "Directives by Content-Type",
        snap.content_types.len(),
        config.top_directives,
    ));
    for sample in snap.content_types.iter().take(config.top_directives) {
        out.push_str(&format!(
            "  - {:>dw$} {} ({} of directives)\n",
            sample.count,
            sample.value,
            percent(rate(sample.count, snap.directives))
        ));
    }
    out.push('\n');

    out.push_str(&heading(
        "Directive Parameters",
        snap.parameters.len(),
        config.top_directives,
    ));
    for sample in snap.parameters.iter().take(config.top_directives) {
        out.push_str(&format!("  - {:>dw$} {}\n", sample.count, sample.value));
    }
    out.push('\n');

    render_max_age(&mut out, snap, config, hw);
    render_combinations(&mut out, snap);

    out
}

fn heading(title: &str, len: usize, limit: usize) -> String {
    if len > limit {
        format!("* {} (top {})\n", title, limit)
    } else {
        format!("* {}\n", title)
    }
}

fn summarise(
    out: &mut String,
    title: &str,
    stats: &[DirectiveStat],
    snap: &CacheControlSnapshot,
    config: &ReportConfig,
    dw: usize,
) {
    out.push_str(&heading(title, stats.len(), config.top_directives));
    let padding = " ".repeat(dw);
    for stat in stats.iter().take(config.top_directives) {
        out.push_str(&format!(
            "  - {:>dw$} {} ({} of CC headers seen on {} / {} of origins)\n",
            stat.count,
            stat.name,
            percent(rate(stat.count, snap.headers)),
            stat.origins,
            percent(rate(stat.origins as u64, snap.origins as u64))
        ));
        if !stat.samples.is_empty() {
            let samples: Vec<String> = stat
                .samples
                .iter()
                .take(config.top_samples)
                .map(|s| format!("{} ({})", s.value, s.count))
                .collect();
            out.push_str(&format!("     {}{}\n", padding, samples.join(", ")));
        }
    }
    out.push('\n');
}

fn render_max_age(out: &mut String, snap: &CacheControlSnapshot, config: &ReportConfig, hw: usize) {
    let m = &snap.max_age;
    let of_directives = |part: u64| percent(rate(part, m.directives));

    out.push_str("* Maxage bad values (% of [s]max-age directives)\n");
    out.push_str(&format!(
        "  - {:>hw$} overflows ({})\n",
        m.overflow,
        of_directives(m.overflow)
    ));
    out.push_str(&format!(
        "  - {:>hw$} decimal values ({})\n",
        m.decimal,
        of_directives(m.decimal)
    ));
    out.push_str(&format!(
        "  - {:>hw$} negative values ({})\n",
        m.negative,
        of_directives(m.negative)
    ));
    out.push_str(&format!(
        "  - {:>hw$} non-numeric values ({})\n",
        m.non_numeric,
        of_directives(m.non_numeric)
    ));
    let padding = " ".repeat(hw);
    for sample in m.non_numeric_samples.iter().take(config.top_samples) {
        out.push_str(&format!(
            "{}    - {}, {}\n",
            padding, sample.value, sample.count
        ));
    }
    out.push('\n');

    if !m.small.is_empty() {
        out.push_str("* Small [s]max-age values\n");
        for (value, count) in &m.small {
            out.push_str(&format!(
                "  - {:>6}: {} ({})\n",
                value,
                count,
                of_directives(*count)
            ));
        }
        out.push('\n');
    }
}

fn render_combinations(out: &mut String, snap: &CacheControlSnapshot) {
    out.push_str("* Clashing directives\n");
    out.push_str(&format!(
        "  - {} with [s]max-age and no-cache/no-store present ({} of responses with [s]max-age)\n",
        snap.max_age_clash,
        percent(rate(snap.max_age_clash, snap.max_age.headers))
    ));
    out.push_str(&format!(
        "  - {} with a positive [s]max-age and no-cache/no-store ({} of responses with [s]max-age)\n",
        snap.max_age_conflicting,
        percent(rate(snap.max_age_conflicting, snap.max_age.headers))
    ));
    for rule in &snap.rules {
        out.push_str(&format!(
            "  - {} {} ({} of responses with {})\n",
            rule.fired,
            rule.label,
            percent(rate(rule.fired, rule.with_directive)),
            rule.directive
        ));
    }
}
