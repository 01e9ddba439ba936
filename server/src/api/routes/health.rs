//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::PrefixStore;
use crate::data::cache::CacheService;

#[derive(Clone)]
pub struct HealthApiState {
    pub store: Arc<dyn PrefixStore>,
    pub cache: Arc<CacheService>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Document store backend and whether it answered
    pub store: BackendHealth,
    /// Cache backend and whether it answered
    pub cache: BackendHealth,
}

#[derive(Serialize, ToSchema)]
pub struct BackendHealth {
    pub backend: &'static str,
    pub ok: bool,
}

pub fn routes(store: Arc<dyn PrefixStore>, cache: Arc<CacheService>) -> Router<()> {
    Router::new()
        .route("/", get(health))
        .with_state(HealthApiState { store, cache })
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store or cache unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<HealthApiState>) -> impl IntoResponse {
    let (store, cache) = tokio::join!(state.store.health_check(), state.cache.health_check());

    if let Err(e) = &store {
        tracing::warn!(
            error = %e,
            backend = state.store.backend_name(),
            "Store health check failed"
        );
    }
    if let Err(e) = &cache {
        tracing::warn!(
            error = %e,
            backend = state.cache.backend_name(),
            "Cache health check failed"
        );
    }

    let healthy = store.is_ok() && cache.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            store: BackendHealth {
                backend: state.store.backend_name(),
                ok: store.is_ok(),
            },
            cache: BackendHealth {
                backend: state.cache.backend_name(),
                ok: cache.is_ok(),
            },
        }),
    )
}
