//! Text rendering of structured field parse results.

use super::percent;
use crate::analysis::parse_stats::ParseStatsSnapshot;
use crate::config::ReportConfig;

pub fn render(snap: &ParseStatsSnapshot, config: &ReportConfig) -> String {
    let mut out = String::new();
    let name_width = snap.results.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let count_width = snap
        .results
        .iter()
        .map(|r| r.succeed.max(r.fail))
        .max()
        .map_or(1, super::width);

    out.push_str(&format!("* Requests: {}\n", snap.header_sets));
    out.push_str("* Parsing Results (succeed / fail)\n");
    for result in &snap.results {
        out.push_str(&format!(
            "{:<name_width$} {:>count_width$} / {:>count_width$} = {:>8}\n",
            result.name,
            result.succeed,
            result.fail,
            percent(result.fail_rate())
        ));
    }
    out.push('\n');

    out.push_str(&format!("* Top {} Headers\n", config.top_headers));
    for sample in snap.seen.iter().take(config.top_headers) {
        out.push_str(&format!("  - {}: {}\n", sample.value, sample.count));
    }

    out
}
