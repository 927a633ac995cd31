//! Configuration management for hcensus

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

impl Config {
    /// Get the config file path (~/.config/hcensus/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Load from `path` when given, otherwise from the default location.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Check values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.reader.chunk_size == 0 {
            return Err("reader.chunk_size must be > 0".to_string());
        }
        if self.parser.cache_capacity == 0 {
            return Err("parser.cache_capacity must be > 0".to_string());
        }
        let threshold = self.analysis.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!(
                "analysis.similarity_threshold {} must be between 0 and 1",
                threshold
            ));
        }
        if self.analysis.small_max_age < 0 {
            return Err("analysis.small_max_age must be >= 0".to_string());
        }
        Ok(())
    }
}
