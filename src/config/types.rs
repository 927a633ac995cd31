//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::fields::{DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_VALUE_LENGTH};
use crate::logformat::DEFAULT_CHUNK_SIZE;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Binary log reader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Bytes requested from the (decompressed) stream per read
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

pub fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Header value parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Values longer than this are skipped as possibly truncated
    #[serde(default = "default_max_value_length")]
    pub max_value_length: usize,
    /// Number of memoized (name, value) parse results
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

pub fn default_max_value_length() -> usize {
    DEFAULT_MAX_VALUE_LENGTH
}

pub fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_value_length: default_max_value_length(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Cache-Control analysis tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A directive is a misspelling when its best similarity exceeds this
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// max-age values with magnitude at or below this go into the histogram
    #[serde(default = "default_small_max_age")]
    pub small_max_age: i64,
}

pub fn default_similarity_threshold() -> f64 {
    0.8
}

pub fn default_small_max_age() -> i64 {
    60
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            small_max_age: default_small_max_age(),
        }
    }
}

/// Text report sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_directives")]
    pub top_directives: usize,
    #[serde(default = "default_top_samples")]
    pub top_samples: usize,
    #[serde(default = "default_top_headers")]
    pub top_headers: usize,
}

pub fn default_top_directives() -> usize {
    25
}

pub fn default_top_samples() -> usize {
    10
}

pub fn default_top_headers() -> usize {
    100
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_directives: default_top_directives(),
            top_samples: default_top_samples(),
            top_headers: default_top_headers(),
        }
    }
}

/// Progress logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Log a progress line every this many header sets (0 disables)
    #[serde(default = "default_tick")]
    pub tick: u64,
}

pub fn default_tick() -> u64 {
    100_000
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick: default_tick(),
        }
    }
}
