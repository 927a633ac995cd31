//! Header value parsing with memoization
//!
//! [`FieldParser`] decides whether a captured header value is worth parsing
//! and, if so, parses it as the structured type registered for its name.
//! Identical `(name, value)` pairs recur constantly in large corpora (shared
//! CDN defaults, framework boilerplate), so grammar results are kept in a
//! bounded LRU cache. The cache only stores parse results; all counting
//! happens in the caller.

mod cache;
pub mod registry;

pub use cache::LruCache;

use tracing::debug;

use crate::config::ParserConfig;
use crate::sfv::{self, SfvError, StructuredFieldValue};

/// Values longer than this are presumed truncated by the archive.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 254;

/// Default number of memoized parse results.
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 15;

/// Result of examining one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Longer than the configured limit; not parsed
    TooLong,
    /// Zero length or whitespace only; not parsed
    Empty,
    /// No structured type registered for this name; left raw
    Unrecognised,
    /// Parsed successfully
    Parsed(StructuredFieldValue),
    /// Grammar violation
    Failed(SfvError),
}

type CacheKey = (Vec<u8>, Vec<u8>);

/// Parses header values, remembering recent results.
pub struct FieldParser {
    max_value_length: usize,
    cache: LruCache<CacheKey, Result<StructuredFieldValue, SfvError>>,
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VALUE_LENGTH, DEFAULT_CACHE_CAPACITY)
    }
}

impl FieldParser {
    pub fn new(max_value_length: usize, cache_capacity: usize) -> Self {
        Self {
            max_value_length,
            cache: LruCache::new(cache_capacity),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.max_value_length, config.cache_capacity)
    }

    /// Examine one header and parse it if it is recognized.
    ///
    /// Length and emptiness are checked before the name, so oversized or
    /// blank values are reported as such even for unrecognized headers.
    pub fn parse(&mut self, name: &[u8], value: &[u8]) -> ParseOutcome {
        if value.len() > self.max_value_length {
            return ParseOutcome::TooLong;
        }
        if is_blank(value) {
            return ParseOutcome::Empty;
        }
        let Some(field_type) = registry::field_type(name) else {
            return ParseOutcome::Unrecognised;
        };

        let key = (name.to_vec(), value.to_vec());
        let result = match self.cache.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let parsed = sfv::parse(value, field_type);
                self.cache.insert(key, parsed.clone());
                parsed
            }
        };

        match result {
            Ok(value) => ParseOutcome::Parsed(value),
            Err(reason) => ParseOutcome::Failed(reason),
        }
    }

    /// Log cache effectiveness at debug level.
    pub fn log_cache_stats(&self) {
        debug!(
            hits = self.cache.hits(),
            misses = self.cache.misses(),
            entries = self.cache.len(),
            capacity = self.cache.capacity(),
            "Field parse cache"
        );
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache.hits()
    }
}

/// Zero length, or only ASCII whitespace (vertical tab included).
pub fn is_blank(value: &[u8]) -> bool {
    value
        .iter()
        .all(|&b| b.is_ascii_whitespace() || b == 0x0b)
}
