//! Storage Backend Module
//!
//! Narrow raw-bytes interface the persistent tier writes through, plus the
//! filesystem implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};

/// Suffix of in-flight writes. Never matches a committed entry name.
const TEMP_SUFFIX: &str = "tmp";

// == Storage Backend ==
/// Reads, writes, removes and lists raw bytes by name.
///
/// Implementations must treat a missing name as a normal outcome on `read`
/// and `remove`, and must never expose partially written content to `read`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the bytes stored under `name`, or `None` if absent.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `bytes` under `name`, replacing any previous content.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Removes `name`. Absent names are not an error.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Lists every stored name.
    async fn list(&self) -> Result<Vec<String>>;
}

// == Filesystem Backend ==
/// One regular file per name under a single directory.
#[derive(Debug)]
pub struct FsBackend {
    dir: PathBuf,
    /// Sequence for unique temporary file names
    write_seq: AtomicU64,
}

impl FsBackend {
    // == Constructor ==
    /// Creates a backend rooted at `dir`. Does not touch the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_seq: AtomicU64::new(0),
        }
    }

    /// Creates the directory (and parents) if absent.
    pub async fn create_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| self.unavailable(source))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unavailable(&self, source: std::io::Error) -> CacheError {
        CacheError::StorageUnavailable {
            path: self.dir.clone(),
            source,
        }
    }

    // == Classify ==
    /// Maps a per-file I/O failure to either a directory-level error or
    /// hands it back when the directory itself is still reachable.
    async fn classify(&self, err: std::io::Error) -> std::result::Result<std::io::Error, CacheError> {
        match fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(err),
            Ok(_) => Err(self.unavailable(std::io::Error::new(
                ErrorKind::Other,
                "cache path is not a directory",
            ))),
            Err(dir_err) => Err(self.unavailable(dir_err)),
        }
    }
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) => {
                let e = self.classify(e).await?;
                if e.kind() != ErrorKind::NotFound {
                    warn!(name, error = %e, "Failed to read cache file, treating as miss");
                }
                Ok(None)
            }
        }
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let target = self.dir.join(name);
        let temp = self
            .dir
            .join(format!("{}.{}.{}.{}", name, std::process::id(), seq, TEMP_SUFFIX));

        if let Err(e) = fs::write(&temp, bytes).await {
            let e = self.classify(e).await?;
            let _ = fs::remove_file(&temp).await;
            return Err(CacheError::Io(e));
        }

        // rename within one directory replaces the target atomically
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            let e = self.classify(e).await?;
            return Err(CacheError::Io(e));
        }

        debug!(name, size = bytes.len(), "Wrote cache file");
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let e = self.classify(e).await?;
                if e.kind() == ErrorKind::NotFound {
                    Ok(())
                } else {
                    Err(CacheError::Io(e))
                }
            }
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut dir = fs::read_dir(&self.dir)
            .await
            .map_err(|source| self.unavailable(source))?;

        let mut names = Vec::new();
        while let Some(item) = dir.next_entry().await.map_err(|source| self.unavailable(source))? {
            let is_file = item.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = item.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }
}
