// Response memoizer - TTL-bounded store of provider answers
// Author: kelexine (https://github.com/kelexine)

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::fingerprint::Fingerprint;
use crate::cache::models::{CacheEntry, CacheStats};
use crate::metrics;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Process-wide store mapping request fingerprints to provider answers.
///
/// Entries are valid for `ttl` after insertion. Expired entries are never
/// swept; they are ignored by [`lookup`](Self::lookup) and overwritten by the
/// next [`store`](Self::store) for the same key. The map therefore grows for
/// the lifetime of the process.
pub struct ResponseMemoizer {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<Fingerprint, CacheEntry>>,
    stats: Mutex<CacheStats>,
}

impl ResponseMemoizer {
    /// Create a memoizer backed by the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a memoizer with an injected time source
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the entry for `fingerprint` if it is younger than the TTL.
    ///
    /// An absent entry and an expired one are both a miss.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let now = self.clock.now();
        let hit = self
            .entries
            .read()
            .get(fingerprint)
            .filter(|entry| now.saturating_duration_since(entry.created_at) < self.ttl)
            .cloned();

        let mut stats = self.stats.lock();
        if hit.is_some() {
            stats.hits += 1;
            metrics::record_cache_hit();
            debug!("Cache hit: {}", fingerprint.namespace());
        } else {
            stats.misses += 1;
            metrics::record_cache_miss();
            debug!("Cache miss: {}", fingerprint.namespace());
        }

        hit
    }

    /// Insert or overwrite the entry for `fingerprint`, stamped with the current time.
    pub fn store(&self, fingerprint: Fingerprint, result: impl Into<String>) {
        let entry = CacheEntry {
            result: result.into(),
            created_at: self.clock.now(),
        };

        let len = {
            let mut entries = self.entries.write();
            entries.insert(fingerprint, entry);
            entries.len()
        };

        self.stats.lock().stores += 1;
        metrics::record_cache_store();
        metrics::update_cache_entries(len);
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}
