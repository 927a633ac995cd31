//! CLI definitions for hcensus
//!
//! Kept apart from main.rs so the argument structure can be tested directly.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::report::OutputFormat;

/// Build clap styles.
///
/// - Green: headers, usage, literals
/// - White: placeholders and valid values
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Version string: the package version, plus the git commit for dev builds.
pub fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let base = env!("CARGO_PKG_VERSION");
        if cfg!(feature = "release") {
            return base.to_string();
        }
        match option_env!("VERGEN_GIT_SHA") {
            Some(sha) if !sha.is_empty() => format!("{}-{}", base, sha),
            _ => base.to_string(),
        }
    })
}

/// Which report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Cache-Control directive usage, anomalies and conflicts
    CacheControl,
    /// Structured field parse success per header name
    ParseStats,
    /// Unparseable values of one header (needs --field)
    WeirdValues,
    /// Header names missing from a registry (needs --registry)
    Unregistered,
}

#[derive(Parser, Debug)]
#[command(name = "hcensus")]
#[command(about = "[ hcensus ] - mine HTTP header corpora for Cache-Control statistics")]
#[command(
    long_about = "hcensus - mine captured HTTP response headers for Cache-Control statistics.

Reads one or more binary header logs (plain or gzip-compressed), parses
header values as Structured Field Values and reports on what it finds.
Progress is logged to stderr; the report goes to stdout. Ctrl+C stops the
pass and still prints the partial report.

EXAMPLES:
    hcensus headers.bin.gz                          Cache-Control report
    hcensus --report parse-stats a.bin b.bin        Parse success per header
    hcensus --report weird-values --field age x.bin Why age values fail
    hcensus --report unregistered --registry names.txt x.bin
    hcensus --format json headers.bin.gz            Full snapshot as JSON"
)]
#[command(version = version())]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Binary header log(s) to read
    #[arg(required = true, value_name = "LOG")]
    pub logs: Vec<PathBuf>,

    /// Report to produce
    #[arg(long, short, value_enum, default_value_t = ReportKind::CacheControl)]
    pub report: ReportKind,

    /// Header name examined by the weird-values report
    #[arg(long, value_name = "NAME", required_if_eq("report", "weird-values"))]
    pub field: Option<String>,

    /// File of registered header names, one per line
    #[arg(long, value_name = "PATH", required_if_eq("report", "unregistered"))]
    pub registry: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file (default: ~/.config/hcensus/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of logs processed in parallel
    #[arg(long, short, value_name = "N", value_parser = clap::value_parser!(usize))]
    pub jobs: Option<usize>,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by `-v`/`-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::WARN;
        }
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
