//! hcensus - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::{debug, info};

use hcensus::analysis::{
    Analysis, CacheControlAnalysis, ParseStatsAnalysis, Registry, UnregisteredAnalysis,
    WeirdValuesAnalysis,
};
use hcensus::cli::{Cli, ReportKind};
use hcensus::pipeline::{self, RunSummary};
use hcensus::report;
use hcensus::{Config, InterruptGuard};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::resolve(cli.config.as_deref())?;
    debug!(?config, "Loaded configuration");

    let guard = InterruptGuard::new();
    guard.register_signal_handlers();

    match cli.report {
        ReportKind::CacheControl => run(&cli, &config, &guard, || {
            CacheControlAnalysis::new(&config.analysis)
        }),
        ReportKind::ParseStats => run(&cli, &config, &guard, ParseStatsAnalysis::new),
        ReportKind::WeirdValues => {
            let field = cli
                .field
                .clone()
                .context("--field is required for the weird-values report")?;
            run(&cli, &config, &guard, || WeirdValuesAnalysis::new(&field))
        }
        ReportKind::Unregistered => {
            let path = cli
                .registry
                .as_deref()
                .context("--registry is required for the unregistered report")?;
            let registry = Registry::load(path)?;
            info!(names = registry.len(), "Loaded header registry");
            run(&cli, &config, &guard, || {
                UnregisteredAnalysis::new(registry.clone())
            })
        }
    }
}

fn run<A, F>(cli: &Cli, config: &Config, guard: &InterruptGuard, make: F) -> Result<()>
where
    A: Analysis + Send,
    F: Fn() -> A + Sync,
{
    let (analysis, summary) = pipeline::run_files(&cli.logs, cli.jobs, config, guard, make)?;
    log_summary(&summary);

    let output = report::render(&analysis, &summary, cli.format, &config.report)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write report")?;
    stdout.flush().context("Failed to write report")?;
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    info!(
        files = summary.files,
        sets = summary.sets,
        records = summary.reader.records,
        too_long = summary.dispatch.too_long,
        empty = summary.dispatch.empty,
        failed = summary.dispatch.failed,
        truncated_bytes = summary.reader.truncated_bytes,
        interrupted = summary.interrupted,
        "Pass complete"
    );
}
