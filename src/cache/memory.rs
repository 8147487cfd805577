//! Memory Tier Module
//!
//! In-process map from location to entry, owned by one cache instance.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, Location};

// == Memory Tier ==
/// Thread-safe in-memory entry storage.
///
/// Expired entries stay in the map until overwritten or deleted; reads
/// report them as absent.
#[derive(Debug, Default)]
pub struct MemoryTier {
    entries: RwLock<HashMap<Location, CacheEntry>>,
}

impl MemoryTier {
    // == Constructor ==
    /// Creates an empty memory tier.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns a clone of the entry if present and live.
    pub fn get(&self, location: &Location) -> Option<CacheEntry> {
        let now = current_timestamp_ms();
        self.entries
            .read()
            .get(location)
            .filter(|entry| entry.is_live_at(now))
            .cloned()
    }

    // == Set ==
    /// Stores or overwrites the entry at `location`.
    pub fn set(&self, location: Location, entry: CacheEntry) {
        self.entries.write().insert(location, entry);
    }

    // == Delete ==
    /// Removes the entry. Returns whether anything was stored.
    pub fn delete(&self, location: &Location) -> bool {
        self.entries.write().remove(location).is_some()
    }

    // == Has ==
    /// Same liveness check as `get`, without cloning the value.
    pub fn has(&self, location: &Location) -> bool {
        let now = current_timestamp_ms();
        self.entries
            .read()
            .get(location)
            .is_some_and(|entry| entry.is_live_at(now))
    }

    // == Keys ==
    /// Lists every stored location, including lazily-expired ones.
    pub fn keys(&self) -> Vec<Location> {
        self.entries.read().keys().cloned().collect()
    }

    // == Length ==
    /// Returns the number of physically stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
