//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{build, health, suggest};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::PrefixStore;
use crate::data::cache::CacheService;
use crate::domain::{BuildPipeline, SuggestCache};

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;
        let shutdown = app.shutdown.clone();

        let addr = SocketAddr::new(
            app.config
                .server
                .host
                .parse()
                .with_context(|| format!("Invalid server host: {}", app.config.server.host))?,
            app.config.server.port,
        );

        let store = app.store.repository();
        let lookup = Arc::new(SuggestCache::new(app.cache.clone(), store.clone()));

        let router = router(store, app.cache.clone(), lookup, app.pipeline.clone());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(address = %addr, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

/// Assemble every route with the shared layers
pub fn router(
    store: Arc<dyn PrefixStore>,
    cache: Arc<CacheService>,
    lookup: Arc<SuggestCache>,
    pipeline: Arc<BuildPipeline>,
) -> Router {
    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .nest("/api/v1/health", health::routes(store, cache))
        .nest("/api/v1/suggest", suggest::routes(lookup))
        .nest("/api/v1/build", build::routes(pipeline))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}
