//! Report rendering
//!
//! Text reports are ranked listings with percentage rates, written for a
//! terminal. JSON reports carry the full snapshot plus the run summary.

pub mod cache_control;
pub mod parse_stats;
pub mod unregistered;
pub mod weird_values;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::analysis::Analysis;
use crate::config::ReportConfig;
use crate::pipeline::RunSummary;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render the report of `analysis` after a run.
pub fn render<A: Analysis + ?Sized>(
    analysis: &A,
    summary: &RunSummary,
    format: OutputFormat,
    config: &ReportConfig,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = analysis.render_text(config);
            if summary.interrupted {
                out.push_str("\n(interrupted; partial results)\n");
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let document = serde_json::json!({
                "run": summary,
                "report": analysis.to_json()?,
            });
            let mut out = serde_json::to_string_pretty(&document)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Percentage with three decimals.
pub fn percent(value: f64) -> String {
    format!("{:.3}%", value)
}

/// Number of decimal digits in `n`.
pub fn width(n: u64) -> usize {
    n.to_string().len()
}
