//! Cache Statistics Module
//!
//! Tracks lookups served by each tier and misses.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered by the memory tier
    pub memory_hits: u64,
    /// Lookups answered by the persistent tier
    pub persistent_hits: u64,
    /// Lookups that found nothing live (absent, expired or corrupt)
    pub misses: u64,
    /// Entries physically held in memory, expired ones included
    pub memory_entries: usize,
}

impl CacheStats {
    /// Total hits across tiers.
    pub fn hits(&self) -> u64 {
        self.memory_hits + self.persistent_hits
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by concurrent callers.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    memory_hits: AtomicU64,
    persistent_hits: AtomicU64,
    misses: AtomicU64,
}

impl StatsRecorder {
    pub fn record_memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistent_hit(&self) {
        self.persistent_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, memory_entries: usize) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            persistent_hits: self.persistent_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            memory_entries,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::default().snapshot(0);
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed_tiers() {
        let recorder = StatsRecorder::default();
        recorder.record_memory_hit();
        recorder.record_persistent_hit();
        recorder.record_miss();
        recorder.record_miss();

        let stats = recorder.snapshot(3);
        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.hit_rate(), 0.5);
        assert_eq!(stats.memory_entries, 3);
    }
}
