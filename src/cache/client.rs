//! Cache Client Module
//!
//! The `CacheClient` protocol and the tiered memory/file implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::backend::FsBackend;
use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheKey, CacheStats, Location, MemoryTier, PersistentTier, Ttl};
use crate::config::Config;
use crate::error::Result;

// == Cache Client ==
/// Stable cache protocol shared by every implementation.
///
/// Misses, expired entries and unreadable entries all come back as
/// `Ok(None)` / `Ok(false)`; errors are reserved for malformed keys and
/// unreachable storage.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Returns the live entry for `key`, if any.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>>;

    /// Stores `value` under `key`. `None` applies the client's default ttl.
    async fn set(&self, key: &CacheKey, value: Value, ttl: Option<Ttl>) -> Result<()>;

    /// Removes `key`. Absent keys are not an error.
    async fn delete(&self, key: &CacheKey) -> Result<()>;

    /// True iff `get` would return a live entry.
    async fn has(&self, key: &CacheKey) -> Result<bool>;

    /// Lists stored keys as decoded locations.
    async fn keys(&self) -> Result<Vec<Location>>;

    /// Opens external connections. Called once before any other operation.
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    /// Releases external connections. Called once after all other operations.
    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

// == Tiered Cache ==
/// Memory and/or persistent tiers behind one client.
///
/// Reads consult memory first, then the persistent tier. A persistent hit
/// is returned as-is and never copied into memory. Writes build a single
/// entry so both tiers carry the same `stored` timestamp.
pub struct TieredCache {
    memory: Option<MemoryTier>,
    persistent: Option<PersistentTier>,
    /// Segment applied to plain keys
    segment: String,
    /// TTL applied when `set` gets none
    default_ttl: Ttl,
    stats: StatsRecorder,
}

impl TieredCache {
    // == Constructor ==
    /// Creates a cache from already-built tiers.
    ///
    /// # Arguments
    /// * `memory` - Enable the memory tier
    /// * `persistent` - Persistent tier, or `None` to disable persistence
    /// * `segment` - Default segment for plain keys
    /// * `default_ttl` - TTL used when `set` is called without one
    pub fn new(
        memory: bool,
        persistent: Option<PersistentTier>,
        segment: impl Into<String>,
        default_ttl: Ttl,
    ) -> Self {
        Self {
            memory: memory.then(MemoryTier::new),
            persistent,
            segment: segment.into(),
            default_ttl,
            stats: StatsRecorder::default(),
        }
    }

    // == Open ==
    /// Creates a cache from configuration, creating `<base>/<name>/` when
    /// persistence is enabled.
    pub async fn open(config: &Config) -> Result<Self> {
        let persistent = if config.persist {
            let backend = FsBackend::new(config.cache_dir());
            backend.create_dir().await?;
            info!(cache_dir = %backend.dir().display(), "Persistent tier ready");
            Some(PersistentTier::new(Arc::new(backend)))
        } else {
            None
        };

        let cache = Self::new(
            config.memory,
            persistent,
            config.segment.clone(),
            config.default_ttl(),
        );
        info!(
            memory = cache.is_memory_enabled(),
            persist = cache.is_persist_enabled(),
            segment = %cache.segment(),
            "Cache opened"
        );

        Ok(cache)
    }

    pub fn is_memory_enabled(&self) -> bool {
        self.memory.is_some()
    }

    pub fn is_persist_enabled(&self) -> bool {
        self.persistent.is_some()
    }

    /// Default segment applied to plain keys.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let memory_entries = self.memory.as_ref().map_or(0, MemoryTier::len);
        self.stats.snapshot(memory_entries)
    }
}

#[async_trait]
impl CacheClient for TieredCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let location = key.resolve(&self.segment)?;

        if let Some(entry) = self.memory.as_ref().and_then(|m| m.get(&location)) {
            self.stats.record_memory_hit();
            debug!(location = %location, "Memory hit");
            return Ok(Some(entry));
        }

        if let Some(persistent) = &self.persistent {
            if let Some(entry) = persistent.get(&location).await? {
                self.stats.record_persistent_hit();
                debug!(location = %location, "Persistent hit");
                return Ok(Some(entry));
            }
        }

        self.stats.record_miss();
        debug!(location = %location, "Cache miss");
        Ok(None)
    }

    async fn set(&self, key: &CacheKey, value: Value, ttl: Option<Ttl>) -> Result<()> {
        let location = key.resolve(&self.segment)?;
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));

        if let Some(persistent) = &self.persistent {
            persistent.set(&location, &entry).await?;
        }
        if let Some(memory) = &self.memory {
            memory.set(location.clone(), entry);
        }

        debug!(location = %location, "Stored entry");
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<()> {
        let location = key.resolve(&self.segment)?;

        if let Some(memory) = &self.memory {
            memory.delete(&location);
        }
        if let Some(persistent) = &self.persistent {
            persistent.delete(&location).await?;
        }

        debug!(location = %location, "Deleted entry");
        Ok(())
    }

    async fn has(&self, key: &CacheKey) -> Result<bool> {
        let location = key.resolve(&self.segment)?;

        if self.memory.as_ref().is_some_and(|m| m.has(&location)) {
            return Ok(true);
        }

        match &self.persistent {
            Some(persistent) => Ok(persistent.get(&location).await?.is_some()),
            None => Ok(false),
        }
    }

    async fn keys(&self) -> Result<Vec<Location>> {
        match (&self.persistent, &self.memory) {
            (Some(persistent), _) => persistent.keys().await,
            (None, Some(memory)) => Ok(memory.keys()),
            (None, None) => Ok(Vec::new()),
        }
    }
}
