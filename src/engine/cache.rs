//! Bounded TTL cache for structured query results.
//!
//! Keyed by graph id plus a hash of the serialized query. The cache is a
//! pure latency optimization: correctness never depends on it, and
//! concurrent populate races are last-write-wins. When capacity is
//! exceeded, the entries that were cheapest to compute (lowest recorded
//! execution time) are evicted first.

use super::query::{GraphQuery, QueryResult};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

/// Default time-to-live for cached results.
pub(crate) const DEFAULT_TTL: Duration = Duration::from_secs(300);
/// Default entry capacity.
pub(crate) const DEFAULT_CAPACITY: usize = 100;

struct CacheEntry {
    result: QueryResult,
    stored_at: Instant,
    execution_ms: f64,
}

pub(crate) struct QueryCache {
    entries: HashMap<u64, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl QueryCache {
    pub(crate) fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Cache key for a (graph id, query) pair.
    ///
    /// The query hashes through its JSON form so every field participates
    /// without a hand-maintained `Hash` impl.
    pub(crate) fn key(graph_id: &str, query: &GraphQuery) -> u64 {
        let mut hasher = DefaultHasher::new();
        graph_id.hash(&mut hasher);
        // Serialization of an in-memory query cannot fail
        serde_json::to_string(query)
            .unwrap_or_default()
            .hash(&mut hasher);
        hasher.finish()
    }

    /// Fresh result for the key, if present and within TTL. Expired
    /// entries are dropped on access.
    pub(crate) fn get(&mut self, key: u64) -> Option<QueryResult> {
        match self.entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => Some(entry.result.clone()),
            Some(_) => {
                self.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store a result, then evict cheapest entries while over capacity.
    pub(crate) fn insert(&mut self, key: u64, result: QueryResult, execution_ms: f64) {
        self.entries.insert(
            key,
            CacheEntry {
                result,
                stored_at: Instant::now(),
                execution_ms,
            },
        );

        while self.entries.len() > self.capacity {
            let cheapest = self
                .entries
                .iter()
                .min_by(|(_, a), (_, b)| {
                    a.execution_ms
                        .partial_cmp(&b.execution_ms)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(&k, _)| k);
            match cheapest {
                Some(k) => {
                    self.entries.remove(&k);
                }
                None => break,
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
