//! Tiered Cache - A pluggable key-value cache client
//!
//! Stores JSON values in process memory, on disk, or both, with per-entry
//! TTL and lazy expiration.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheClient, CacheEntry, CacheKey, Location, TieredCache, Ttl};
pub use config::Config;
pub use error::{CacheError, Result};
