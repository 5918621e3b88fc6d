//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{NamedKey, NamespacedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    BulkGetRequest, BulkGetResponse, GetResponse, HealthResponse, InvalidateResponse, PutRequest,
    PutResponse, StatsResponse,
};
use crate::store::MemoryStore;

/// Cache client as served over HTTP.
pub type ServerCache = NamespacedCache<Arc<MemoryStore>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache client; its store is reachable through `cache.store()`
    pub cache: Arc<ServerCache>,
}

impl AppState {
    /// Creates a new AppState around an existing client.
    pub fn new(cache: ServerCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration, backed by a fresh
    /// in-memory store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(MemoryStore::new(config.max_entries));
        let cache = NamespacedCache::new(store, config.cache_config())?;
        Ok(Self::new(cache))
    }

    /// The in-memory store behind the cache.
    pub fn store(&self) -> &Arc<MemoryStore> {
        self.cache.store()
    }
}

/// Handler for PUT /cache/:namespace/:key
///
/// Stores a value; `stored` in the response reports whether the store
/// acknowledged it.
pub async fn put_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    let named = NamedKey::new(namespace.as_str(), key.as_bytes())?;

    let stored = match req.expiry {
        Some(secs) => {
            state
                .cache
                .put_with_expiry(&named, req.value.as_bytes(), Duration::from_secs(secs))
                .await
        }
        None => state.cache.put(&named, req.value.as_bytes()).await,
    };

    Ok(Json(PutResponse::new(namespace, key, stored)))
}

/// Handler for GET /cache/:namespace/:key
///
/// Returns 404 for any miss, including store failures.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let named = NamedKey::new(namespace.as_str(), key.as_bytes())?;

    match state.cache.get(&named).await {
        Some(value) => Ok(Json(GetResponse::new(&named, &value))),
        None => Err(CacheError::NotFound(format!("{}/{}", namespace, key))),
    }
}

/// Handler for POST /cache/bulk
///
/// Fetches every requested key in one store round trip.
pub async fn bulk_get_handler(
    State(state): State<AppState>,
    Json(req): Json<BulkGetRequest>,
) -> Result<Json<BulkGetResponse>> {
    let keys = req.named_keys()?;
    let found = state.cache.get_bulk(&keys).await;

    // Preserve request order; a key named twice counts once
    let mut hits = Vec::with_capacity(found.len());
    let mut seen = HashSet::with_capacity(keys.len());
    for key in &keys {
        if !seen.insert(key) {
            continue;
        }
        if let Some(value) = found.get(key) {
            hits.push(GetResponse::new(key, value));
        }
    }

    Ok(Json(BulkGetResponse {
        misses: seen.len() - hits.len(),
        hits,
    }))
}

/// Handler for POST /namespaces/:namespace/invalidate
///
/// Bumps the namespace generation; nothing is deleted from the store.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let generation = state.cache.invalidate(&namespace)?;
    Ok(Json(InvalidateResponse::new(namespace, generation)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store_stats = state.store().stats().await;

    Json(StatsResponse::new(
        state.cache.stats(),
        store_stats,
        state.cache.registry().namespaces(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
