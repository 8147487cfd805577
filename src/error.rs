//! Error types for the cache client
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache client and its HTTP front end.
///
/// A cache miss is never an error: absent, expired and corrupt entries all
/// surface as `Ok(None)`. Only structural failures end up here.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Malformed key (empty id or segment, location too long)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Stored bytes are not a valid cache entry
    #[error("Corrupt entry: {0}")]
    Decode(String),

    /// The cache directory itself cannot be accessed
    #[error("Storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Per-file I/O failure while writing
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Key not found or expired (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Decode(_) | CacheError::Io(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache client.
pub type Result<T> = std::result::Result<T, CacheError>;
