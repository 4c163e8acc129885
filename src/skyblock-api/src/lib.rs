//! Skyblock inventory service
//!
//! Serves parsed inventories, ender chests and accessory bags for a player's
//! profile. Profile data is fetched from the upstream API and kept in the
//! profile cache so repeated lookups stay local.

pub mod client;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyblock::{
    parse_inventory_data, resolve_profile, Inventory, InventoryError, InventoryKind, Member,
};
use skyblock_cache::{CacheError, CacheRepository, SqliteCache};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use client::{HypixelClient, ProfileSource, SourceError, DEFAULT_API_URL};

// =============================================================================
// App State
// =============================================================================

pub struct AppState {
    pub cache: Mutex<SqliteCache>,
    pub source: Arc<dyn ProfileSource>,
}

impl AppState {
    pub fn new(cache: SqliteCache, source: Arc<dyn ProfileSource>) -> Self {
        Self {
            cache: Mutex::new(cache),
            source,
        }
    }

    fn cache(&self) -> Result<MutexGuard<'_, SqliteCache>, ApiError> {
        self.cache
            .lock()
            .map_err(|e| ApiError::Lock(e.to_string()))
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Player does not have profile {0}")]
    ProfileNotFound(String),

    #[error("{0}; player may not have enabled API")]
    ContainerNotFound(&'static str),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] SourceError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Cached profile is unreadable: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Invalid inventory data: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ProfileNotFound(_) | ApiError::ContainerNotFound(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upstream(SourceError::InvalidPlayer(_)) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CacheRequest {
    /// Lifetime in milliseconds
    pub ttl: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheResponse {
    pub success: bool,
}

// =============================================================================
// Profile lookup
// =============================================================================

/// Member data from the cache, fetched and cached on a miss
async fn cached_member(
    state: &Arc<AppState>,
    player: &str,
    profile: &str,
) -> Result<Member, ApiError> {
    let lookup = {
        let state = Arc::clone(state);
        let (player, profile) = (player.to_string(), profile.to_string());
        tokio::task::spawn_blocking(move || -> Result<Option<String>, ApiError> {
            Ok(state.cache()?.get(&player, &profile)?)
        })
        .await??
    };

    if let Some(snapshot) = lookup {
        tracing::debug!(player = %player, profile = %profile, "cache hit");
        return Ok(Member::from_snapshot(&snapshot)?);
    }

    tracing::debug!(player = %player, profile = %profile, "cache miss");
    refresh_member(state, player, profile, None).await
}

/// Fetch the member from upstream and store it
///
/// `ttl` of `None` uses the cache default.
async fn refresh_member(
    state: &Arc<AppState>,
    player: &str,
    profile: &str,
    ttl: Option<Duration>,
) -> Result<Member, ApiError> {
    let state = Arc::clone(state);
    let (player, profile) = (player.to_string(), profile.to_string());
    tokio::task::spawn_blocking(move || -> Result<Member, ApiError> {
        let response = state.source.fetch_profiles(&player)?;
        let member = resolve_profile(&response, &player, &profile)
            .ok_or_else(|| ApiError::ProfileNotFound(profile.clone()))?
            .member
            .clone();

        let snapshot = member.to_snapshot()?;
        let cache = state.cache()?;
        match ttl {
            Some(ttl) => cache.insert_with_ttl(&player, &profile, &snapshot, ttl)?,
            None => cache.insert(&player, &profile, &snapshot)?,
        }
        tracing::info!(player = %player, profile = %profile, "cached profile");

        Ok(member)
    })
    .await?
}

async fn container(
    state: Arc<AppState>,
    player: String,
    profile: String,
    kind: InventoryKind,
) -> Result<Json<Inventory>, ApiError> {
    let member = cached_member(&state, &player, &profile).await?;
    let data = kind
        .data(&member)
        .ok_or(ApiError::ContainerNotFound(kind.not_found_message()))?
        .to_string();

    let inventory = tokio::task::spawn_blocking(move || parse_inventory_data(&data)).await??;
    tracing::debug!(
        player = %player,
        profile = %profile,
        items = inventory.len(),
        dropped = inventory.dropped,
        "parsed {:?}",
        kind
    );

    Ok(Json(inventory))
}

// =============================================================================
// Handlers
// =============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_inventory(
    State(state): State<Arc<AppState>>,
    AxumPath((player, profile)): AxumPath<(String, String)>,
) -> Result<Json<Inventory>, ApiError> {
    container(state, player, profile, InventoryKind::Inventory).await
}

async fn get_ender_chest(
    State(state): State<Arc<AppState>>,
    AxumPath((player, profile)): AxumPath<(String, String)>,
) -> Result<Json<Inventory>, ApiError> {
    container(state, player, profile, InventoryKind::EnderChest).await
}

async fn get_accessory_bag(
    State(state): State<Arc<AppState>>,
    AxumPath((player, profile)): AxumPath<(String, String)>,
) -> Result<Json<Inventory>, ApiError> {
    container(state, player, profile, InventoryKind::AccessoryBag).await
}

/// Refetch and store a profile; an empty body keeps the default TTL
async fn refresh_cache(
    State(state): State<Arc<AppState>>,
    AxumPath((player, profile)): AxumPath<(String, String)>,
    body: Bytes,
) -> Result<Json<CacheResponse>, ApiError> {
    let request: CacheRequest = if body.is_empty() {
        CacheRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    refresh_member(
        &state,
        &player,
        &profile,
        request.ttl.map(Duration::from_millis),
    )
    .await?;

    Ok(Json(CacheResponse { success: true }))
}

// =============================================================================
// Router
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/{player}/{profile}/inventory", get(get_inventory))
        .route("/{player}/{profile}/enderchest", get(get_ender_chest))
        .route("/{player}/{profile}/accessorybag", get(get_accessory_bag))
        .route("/{player}/{profile}/cache", post(refresh_cache))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
