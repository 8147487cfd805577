//! Persistent Tier Module
//!
//! Maps locations to `<location>.json` names on a storage backend and turns
//! unreadable or expired content into misses.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::backend::StorageBackend;
use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, Location};
use crate::error::Result;

/// Suffix appended to every location to form a file name.
pub const ENTRY_SUFFIX: &str = ".json";

// == Persistent Tier ==
/// Entry storage on top of a `StorageBackend`.
#[derive(Clone)]
pub struct PersistentTier {
    backend: Arc<dyn StorageBackend>,
}

impl PersistentTier {
    // == Constructor ==
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn file_name(location: &Location) -> String {
        format!("{}{}", location, ENTRY_SUFFIX)
    }

    // == Get ==
    /// Returns the entry if stored, decodable and live.
    ///
    /// Corrupt content is logged and left in place; the next `set` of the
    /// same key replaces it.
    pub async fn get(&self, location: &Location) -> Result<Option<CacheEntry>> {
        let Some(bytes) = self.backend.read(&Self::file_name(location)).await? else {
            return Ok(None);
        };

        let entry = match CacheEntry::decode(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(location = %location, error = %e, "Corrupt cache entry, treating as miss");
                return Ok(None);
            }
        };

        if !entry.is_live_at(current_timestamp_ms()) {
            debug!(location = %location, "Persistent entry expired");
            return Ok(None);
        }

        Ok(Some(entry))
    }

    // == Set ==
    /// Encodes and writes the entry, replacing any previous file.
    pub async fn set(&self, location: &Location, entry: &CacheEntry) -> Result<()> {
        let bytes = entry.encode()?;
        self.backend.write(&Self::file_name(location), &bytes).await
    }

    // == Delete ==
    /// Removes the entry's file. Absent files are not an error.
    pub async fn delete(&self, location: &Location) -> Result<()> {
        self.backend.remove(&Self::file_name(location)).await
    }

    // == Keys ==
    /// Lists stored locations, skipping names that are not entry files.
    pub async fn keys(&self) -> Result<Vec<Location>> {
        let names = self.backend.list().await?;

        Ok(names
            .iter()
            .filter_map(|name| name.strip_suffix(ENTRY_SUFFIX))
            .filter_map(Location::parse)
            .collect())
    }
}
