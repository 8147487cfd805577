//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::Ttl;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Parent directory of the cache directory
    pub base: PathBuf,
    /// Subdirectory name for this cache instance
    pub name: String,
    /// Default TTL in milliseconds, None = entries never expire
    pub duration: Option<u64>,
    /// Enable the memory tier
    pub memory: bool,
    /// Enable the persistent tier
    pub persist: bool,
    /// Segment applied to plain keys
    pub segment: String,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BASE` - Cache root directory (default: .cache)
    /// - `CACHE_NAME` - Cache instance name (default: default)
    /// - `CACHE_DURATION` - Default TTL in milliseconds (default: unset, never expire)
    /// - `CACHE_MEMORY` - Enable memory tier (default: true)
    /// - `CACHE_PERSIST` - Enable file tier (default: true)
    /// - `CACHE_SEGMENT` - Default key segment (default: default)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base: env::var("CACHE_BASE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.base),
            name: env::var("CACHE_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.name),
            duration: env::var("CACHE_DURATION")
                .ok()
                .and_then(|v| v.parse().ok()),
            memory: env::var("CACHE_MEMORY")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.memory),
            persist: env::var("CACHE_PERSIST")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.persist),
            segment: env::var("CACHE_SEGMENT")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.segment),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Directory holding this instance's entry files.
    pub fn cache_dir(&self) -> PathBuf {
        self.base.join(&self.name)
    }

    /// TTL applied when `set` is called without one.
    pub fn default_ttl(&self) -> Ttl {
        Ttl::from_millis(self.duration)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: PathBuf::from(".cache"),
            name: "default".to_string(),
            duration: None,
            memory: true,
            persist: true,
            segment: "default".to_string(),
            server_port: 3000,
        }
    }
}
