//! Corpus pass driver
//!
//! Opens a log (plain or gzip), decodes header sets one at a time, dispatches
//! each to an analysis and logs progress. Several logs are processed on a
//! rayon pool with one parser, dispatcher and analysis per file; the
//! analyses are merged in input order afterwards.

use anyhow::{Context, Result};
use humansize::{format_size, DECIMAL};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::analysis::Analysis;
use crate::config::Config;
use crate::dispatch::{DispatchTotals, Dispatcher};
use crate::fields::FieldParser;
use crate::interrupt::InterruptGuard;
use crate::logformat::{BlockReader, ReaderStats};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// What a pass over one or more logs did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub files: usize,
    /// Header sets dispatched
    pub sets: u64,
    pub reader: ReaderStats,
    pub dispatch: DispatchTotals,
    /// Stopped early by a signal
    pub interrupted: bool,
    /// Stopped early by a read error
    pub read_errors: usize,
}

impl RunSummary {
    pub fn add(&mut self, other: &RunSummary) {
        self.files += other.files;
        self.sets += other.sets;
        self.reader.add(&other.reader);
        self.dispatch.add(&other.dispatch);
        self.interrupted |= other.interrupted;
        self.read_errors += other.read_errors;
    }
}

/// Open a log file, transparently decompressing gzip.
pub fn open_log(path: &Path) -> Result<Box<dyn Read + Send>> {
    let file = File::open(path).with_context(|| format!("Failed to open log file: {:?}", path))?;
    let mut reader = BufReader::new(file);
    let head = reader
        .fill_buf()
        .with_context(|| format!("Failed to read log file: {:?}", path))?;

    if head.starts_with(&GZIP_MAGIC) {
        debug!(path = %path.display(), "gzip log detected");
        Ok(Box::new(flate2::read::MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Run `analysis` over one log file.
pub fn run_file<A: Analysis + ?Sized>(
    path: &Path,
    analysis: &mut A,
    config: &Config,
    guard: &InterruptGuard,
) -> Result<RunSummary> {
    let input = open_log(path)?;
    let label = path.display().to_string();
    Ok(run_reader(input, &label, analysis, config, guard))
}

/// Run `analysis` over an already opened byte stream.
///
/// A read error ends the pass with a warning; everything counted up to that
/// point is kept.
pub fn run_reader<R: Read, A: Analysis + ?Sized>(
    input: R,
    label: &str,
    analysis: &mut A,
    config: &Config,
    guard: &InterruptGuard,
) -> RunSummary {
    let mut reader = BlockReader::with_chunk_size(input, config.reader.chunk_size);
    let parser = FieldParser::from_config(&config.parser);
    let mut dispatcher = Dispatcher::for_analysis(parser, analysis);
    let mut summary = RunSummary {
        files: 1,
        ..Default::default()
    };
    let started = Instant::now();
    let tick = config.progress.tick;

    loop {
        if guard.is_interrupted() {
            warn!(file = label, sets = summary.sets, "Interrupted; reporting partial results");
            summary.interrupted = true;
            break;
        }

        let set = match reader.next_set() {
            Ok(Some(set)) => set,
            Ok(None) => break,
            Err(e) => {
                warn!(file = label, error = %e, "Read error; stopping this file");
                summary.read_errors += 1;
                break;
            }
        };

        dispatcher.dispatch(&set, analysis);
        summary.sets += 1;

        if tick > 0 && summary.sets % tick == 0 {
            let elapsed = started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                summary.sets as f64 / elapsed
            } else {
                0.0
            };
            info!(
                file = label,
                bytes = %format_size(reader.stats().bytes_consumed, DECIMAL),
                "response {} ({:.0}/s)",
                summary.sets,
                rate
            );
        }
    }

    summary.reader = reader.stats();
    summary.dispatch = dispatcher.totals();
    dispatcher.parser().log_cache_stats();
    debug!(
        file = label,
        sets = summary.sets,
        truncated_bytes = summary.reader.truncated_bytes,
        unterminated_records = summary.reader.unterminated_records,
        "Finished log"
    );
    summary
}

/// Run one analysis per log and merge them in input order.
///
/// `make` builds a fresh analysis for each worker. `jobs` caps the worker
/// count; `None` lets rayon decide.
pub fn run_files<A, F>(
    paths: &[PathBuf],
    jobs: Option<usize>,
    config: &Config,
    guard: &InterruptGuard,
    make: F,
) -> Result<(A, RunSummary)>
where
    A: Analysis + Send,
    F: Fn() -> A + Sync,
{
    let results = if paths.len() <= 1 {
        run_sequential(paths, config, guard, &make)?
    } else {
        run_parallel(paths, jobs, config, guard, &make)?
    };

    let mut merged = make();
    let mut total = RunSummary::default();
    for (analysis, summary) in results {
        merged.merge(analysis);
        total.add(&summary);
    }
    Ok((merged, total))
}

fn run_one<A: Analysis>(
    path: &Path,
    config: &Config,
    guard: &InterruptGuard,
    make: &impl Fn() -> A,
) -> Result<(A, RunSummary)> {
    let mut analysis = make();
    let summary = run_file(path, &mut analysis, config, guard)?;
    Ok((analysis, summary))
}

fn run_sequential<A: Analysis>(
    paths: &[PathBuf],
    config: &Config,
    guard: &InterruptGuard,
    make: &impl Fn() -> A,
) -> Result<Vec<(A, RunSummary)>> {
    paths
        .iter()
        .map(|path| run_one(path, config, guard, make))
        .collect()
}

fn run_parallel<A, F>(
    paths: &[PathBuf],
    jobs: Option<usize>,
    config: &Config,
    guard: &InterruptGuard,
    make: &F,
) -> Result<Vec<(A, RunSummary)>>
where
    A: Analysis + Send,
    F: Fn() -> A + Sync,
{
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .thread_name(|i| format!("hcensus-{}", i))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "Failed to create thread pool; processing sequentially");
            return run_sequential(paths, config, guard, make);
        }
    };

    pool.install(|| {
        paths
            .par_iter()
            .map(|path| run_one(path, config, guard, make))
            .collect()
    })
}
