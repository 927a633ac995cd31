//! Header names missing from a registry of known field names.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::{merge_counts, merge_nested, ranked, Analysis};
use crate::analysis::cache_control::Sample;
use crate::config::ReportConfig;
use crate::dispatch::ParsedSet;
use crate::logformat::{latin1_to_string, ORIGIN_PSEUDO_HEADER, URL_PSEUDO_HEADER};

/// Headers whose `server` companions are worth listing.
const INTERESTING_HEADERS: &[&[u8]] = &[b"surrogate-key"];

const SERVER: &[u8] = b"server";

/// Set of registered header names, lowercase.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    names: HashSet<Vec<u8>>,
}

impl Registry {
    /// Parse one name per line. Blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        let mut names: HashSet<Vec<u8>> = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_ascii_lowercase().into_bytes())
            .collect();
        names.insert(URL_PSEUDO_HEADER.to_vec());
        names.insert(ORIGIN_PSEUDO_HEADER.to_vec());
        Self { names }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry file: {:?}", path))?;
        Ok(Self::parse(&text))
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Servers seen alongside one interesting header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderServers {
    pub header: String,
    pub servers: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnregisteredSnapshot {
    pub interesting: Vec<HeaderServers>,
    pub unregistered: Vec<Sample>,
}

/// Counts header names that are not in the registry.
#[derive(Debug)]
pub struct UnregisteredAnalysis {
    registry: Registry,
    unregistered: HashMap<String, u64>,
    servers: HashMap<String, HashMap<String, u64>>,
}

impl UnregisteredAnalysis {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            unregistered: HashMap::new(),
            servers: HashMap::new(),
        }
    }

    pub fn snapshot(&self, limit: usize) -> UnregisteredSnapshot {
        let mut interesting: Vec<HeaderServers> = self
            .servers
            .iter()
            .map(|(header, servers)| HeaderServers {
                header: header.clone(),
                servers: Sample::from_ranked(ranked(servers, limit)),
            })
            .collect();
        interesting.sort_by(|a, b| a.header.cmp(&b.header));

        UnregisteredSnapshot {
            interesting,
            unregistered: Sample::from_ranked(ranked(&self.unregistered, limit)),
        }
    }
}

impl Analysis for UnregisteredAnalysis {
    /// Only raw names matter, so nothing is parsed.
    fn interest(&self) -> Option<Vec<Vec<u8>>> {
        Some(Vec::new())
    }

    fn analyse(&mut self, set: &ParsedSet<'_>) {
        let server = set
            .raw
            .get(SERVER)
            .map(latin1_to_string)
            .unwrap_or_else(|| "-".to_string());

        for (name, _) in set.raw.iter() {
            if !self.registry.contains(name) {
                *self.unregistered.entry(latin1_to_string(name)).or_insert(0) += 1;
            }
            if INTERESTING_HEADERS.contains(&name) {
                *self
                    .servers
                    .entry(latin1_to_string(name))
                    .or_default()
                    .entry(server.clone())
                    .or_insert(0) += 1;
            }
        }
    }

    fn merge(&mut self, other: Self) {
        merge_counts(&mut self.unregistered, other.unregistered);
        merge_nested(&mut self.servers, other.servers);
    }

    fn render_text(&self, config: &ReportConfig) -> String {
        crate::report::unregistered::render(&self.snapshot(config.top_headers))
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.snapshot(usize::MAX))
    }
}
