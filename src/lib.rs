//! hcensus Library
//!
//! Mines captured HTTP response header corpora for Cache-Control statistics:
//! a streaming reader for the binary header log, a Structured Field Value
//! parser with a memo cache, a per-response dispatcher, and analyses that
//! aggregate what they see.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod fields;
pub mod interrupt;
pub mod logformat;
pub mod pipeline;
pub mod report;
pub mod sfv;

pub use analysis::{Analysis, CacheControlAnalysis, CacheControlSnapshot};
pub use config::Config;
pub use dispatch::{DispatchTotals, Dispatcher, ParsedSet};
pub use fields::{FieldParser, ParseOutcome};
pub use interrupt::InterruptGuard;
pub use logformat::{BlockReader, HeaderSet};
pub use pipeline::RunSummary;
