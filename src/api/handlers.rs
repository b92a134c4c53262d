//! API Handlers
//!
//! HTTP request handlers: cache administration, direct entry access and
//! reference data.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{CacheStats, TtlCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, KeysResponse, SetRequest,
    SetResponse,
};
use crate::reference::{Country, ReferenceData};

/// Cache key of the iso3 -> country name mapping
pub const COUNTRY_MAPPINGS_KEY: &str = "country_mappings";

/// Country mappings rarely change
pub const COUNTRY_MAPPINGS_TTL: Duration = Duration::from_secs(86_400 * 30);

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Expiring query cache
    pub cache: TtlCache,
    /// Load-once reference tables
    pub reference: Arc<ReferenceData>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: TtlCache, reference: ReferenceData) -> Self {
        Self {
            cache,
            reference: Arc::new(reference),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails when the configured default TTL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = TtlCache::new(config.default_ttl())?;
        Ok(Self::new(cache, ReferenceData::new(config.data_dir.clone())))
    }

    /// Empties the cache before the service starts taking requests, so
    /// nothing carried over from a previous run is ever served.
    pub fn reset_for_startup(&self) {
        self.cache.clear();
        info!("Cache cleared on startup");
    }
}

/// Handler for PUT /cache/entries
///
/// Stores a JSON document in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.map(Duration::from_secs);
    state.cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/entries/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/entries/:key
///
/// Deleting a missing key is not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key);
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for POST /cache/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    info!("Cache cleared by admin request");
    Json(ClearResponse::cleared())
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.get_stats())
}

/// Handler for GET /cache/keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse::new(state.cache.get_keys()))
}

/// Handler for GET /reference/:name
pub async fn reference_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>> {
    state
        .reference
        .document(&name)
        .cloned()
        .map(Json)
        .ok_or(CacheError::NotFound(name))
}

/// Handler for GET /reference/countries/:id
pub async fn country_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Country>> {
    state
        .reference
        .countries()
        .country(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| CacheError::NotFound(format!("country {}", id)))
}

/// Handler for GET /country-mappings
///
/// Cache-aside: served from the cache when present, otherwise rebuilt from
/// the country table and stored for [`COUNTRY_MAPPINGS_TTL`].
pub async fn country_mappings_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, String>>> {
    if let Some(mappings) = state.cache.fetch(COUNTRY_MAPPINGS_KEY) {
        return Ok(Json(mappings));
    }

    let mappings: BTreeMap<String, String> = state
        .reference
        .countries()
        .countries()
        .into_iter()
        .map(|c| (c.iso3_code.clone(), c.name.clone()))
        .collect();

    if mappings.is_empty() {
        return Err(CacheError::NotFound("country reference data".to_string()));
    }

    if let Err(err) = state
        .cache
        .put(COUNTRY_MAPPINGS_KEY, &mappings, Some(COUNTRY_MAPPINGS_TTL))
    {
        warn!("Failed to cache {}: {}", COUNTRY_MAPPINGS_KEY, err);
    }

    Ok(Json(mappings))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        let cache = TtlCache::new(Duration::from_secs(300)).unwrap();
        let fixtures = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        AppState::new(cache, ReferenceData::new(fixtures))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "test_key".to_string(),
            value: json!({"year": 2022}),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"year": 2022}));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state.clone()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert_eq!(state.cache.get_stats().misses, 1);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        state.cache.set("to_delete", json!("value"), None);

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(response.deleted);

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(!response.deleted);
    }

    #[tokio::test]
    async fn test_clear_handler_resets_stats() {
        let state = test_state();
        state.cache.set("a", json!(1), None);
        state.cache.get("a");

        clear_handler(State(state.clone())).await;

        let stats = stats_handler(State(state.clone())).await;
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert!(keys_handler(State(state)).await.keys.is_empty());
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let req = SetRequest {
            key: "".to_string(),
            value: json!("value"),
            ttl: None,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_country_mappings_populates_cache() {
        let state = test_state();

        let mappings = country_mappings_handler(State(state.clone())).await.unwrap();
        assert_eq!(mappings.get("USA").map(String::as_str), Some("United States"));

        let cached: Option<BTreeMap<String, String>> = state.cache.fetch(COUNTRY_MAPPINGS_KEY);
        assert_eq!(cached.as_ref(), Some(&mappings.0));

        // First call missed, the fetch above hit
        let stats = state.cache.get_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test]
    async fn test_country_mappings_served_from_cache() {
        let state = test_state();
        let mut seeded = BTreeMap::new();
        seeded.insert("ZZZ".to_string(), "Cached Only".to_string());
        state.cache.put(COUNTRY_MAPPINGS_KEY, &seeded, None).unwrap();

        let mappings = country_mappings_handler(State(state)).await.unwrap();
        assert_eq!(mappings.0, seeded);
    }

    #[tokio::test]
    async fn test_country_mappings_rebuilds_malformed_cache_entry() {
        let state = test_state();
        state.cache.set(COUNTRY_MAPPINGS_KEY, json!("garbage"), None);

        let mappings = country_mappings_handler(State(state.clone())).await.unwrap();
        assert_eq!(mappings.get("CHN").map(String::as_str), Some("China"));

        let cached: Option<BTreeMap<String, String>> = state.cache.fetch(COUNTRY_MAPPINGS_KEY);
        assert_eq!(cached.as_ref(), Some(&mappings.0));
        // The malformed lookup counted as a miss, the check above as a hit
        let stats = state.cache.get_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_reset_for_startup_empties_cache() {
        let state = test_state();
        state.cache.set("latest_year:USA", json!(2023), None);
        state.cache.get("latest_year:USA");
        state.cache.get("missing");

        state.reset_for_startup();

        assert!(state.cache.get_keys().is_empty());
        assert_eq!(state.cache.get_stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_country_handler() {
        let state = test_state();

        let country = country_handler(State(state.clone()), Path(156)).await.unwrap();
        assert_eq!(country.iso3_code, "CHN");

        let missing = country_handler(State(state), Path(1)).await;
        assert!(matches!(missing, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
