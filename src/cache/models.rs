// Cache entry and statistics models
// Author: kelexine (https://github.com/kelexine)

use std::time::Instant;

/// A provider answer remembered by the memoizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Text returned by the AI provider.
    pub result: String,
    /// When the entry was stored.
    pub created_at: Instant,
}

/// Statistics for memoizer operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a live entry.
    pub hits: u64,
    /// Lookups that found nothing, or only an expired entry.
    pub misses: u64,
    /// Number of inserts and overwrites.
    pub stores: u64,
}
