//! Bounded LRU cache
//!
//! Keeps at most `max_size` entries and evicts the least recently used one
//! when full. Recency is tracked with a queue of `(key, stamp)` pairs; a
//! lookup pushes a fresh stamp instead of searching the queue, and stale
//! queue entries are skipped at eviction time.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// LRU cache owned by a single thread.
pub struct LruCache<K, V> {
    /// Cached entries (key -> (value, latest stamp))
    entries: HashMap<K, (V, u64)>,
    /// Recency order (front = oldest); may hold stale stamps
    lru_order: VecDeque<(K, u64)>,
    /// Maximum number of entries
    max_size: usize,
    next_stamp: u64,
    hits: u64,
    misses: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache holding at most `max_size` entries (minimum 1).
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru_order: VecDeque::new(),
            max_size: max_size.max(1),
            next_stamp: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Get a value, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let stamp = self.next_stamp;
        match self.entries.get_mut(key) {
            Some(entry) => {
                self.hits += 1;
                self.next_stamp += 1;
                entry.1 = stamp;
                self.lru_order.push_back((key.clone(), stamp));
                self.compact_if_needed();
                self.entries.get(key).map(|(v, _)| v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a value, evicting the least recently used entry if full.
    pub fn insert(&mut self, key: K, value: V) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = (value, stamp);
            self.lru_order.push_back((key, stamp));
            self.compact_if_needed();
            return;
        }

        while self.entries.len() >= self.max_size {
            if !self.evict_oldest() {
                break;
            }
        }

        self.entries.insert(key.clone(), (value, stamp));
        self.lru_order.push_back((key, stamp));
        self.compact_if_needed();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Number of lookups that found an entry.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Remove the entry whose latest stamp is oldest. Returns false if empty.
    fn evict_oldest(&mut self) -> bool {
        while let Some((key, stamp)) = self.lru_order.pop_front() {
            let current = matches!(self.entries.get(&key), Some((_, s)) if *s == stamp);
            if current {
                self.entries.remove(&key);
                return true;
            }
        }
        false
    }

    /// Drop stale queue entries once they outnumber live ones.
    fn compact_if_needed(&mut self) {
        if self.lru_order.len() <= self.max_size.saturating_mul(2) {
            return;
        }
        let entries = &self.entries;
        self.lru_order
            .retain(|(key, stamp)| matches!(entries.get(key), Some((_, s)) if s == stamp));
    }
}
