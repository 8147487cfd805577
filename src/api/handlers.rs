//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{CacheClient, TieredCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HasResponse, HealthResponse, KeyQuery, KeysResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes internally, so handlers share it through a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache client
    pub cache: Arc<TieredCache>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: TieredCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the cache, creating its directory when persistence is enabled.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(TieredCache::open(config).await?))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .cache
        .set(&req.cache_key(), req.value.clone(), req.ttl())
        .await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a live entry. Missing, expired and unreadable entries are 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<GetResponse>> {
    let cache_key = query.cache_key(&key);
    let location = cache_key.resolve(state.cache.segment())?;

    match state.cache.get(&cache_key).await? {
        Some(entry) => Ok(Json(GetResponse::new(&location, entry))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<HasResponse>> {
    let present = state.cache.has(&query.cache_key(&key)).await?;
    Ok(Json(HasResponse { key, present }))
}

/// Handler for DELETE /del/:key
///
/// Deleting a key that is not cached still succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&query.cache_key(&key)).await?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Result<Json<KeysResponse>> {
    let locations = state.cache.keys().await?;
    Ok(Json(KeysResponse::new(locations)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
