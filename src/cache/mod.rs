//! Cache Module
//!
//! Key-value caching in process memory, on disk, or both, with per-entry TTL.

mod backend;
mod client;
mod entry;
mod key;
mod memory;
mod persistent;
mod stats;


// Re-export public types
pub use backend::{FsBackend, StorageBackend};
pub use client::{CacheClient, TieredCache};
pub use entry::{current_timestamp_ms, CacheEntry, Ttl};
pub use key::{CacheKey, Location};
pub use memory::MemoryTier;
pub use persistent::{PersistentTier, ENTRY_SUFFIX};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum length in bytes of an encoded location, keeping
/// `<location>.json` and its temporary write names within common 255-byte
/// filename limits.
pub const MAX_LOCATION_LENGTH: usize = 200;
