//! Suggestion lookup endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::types::ApiError;
use crate::core::constants::MAX_PREFIX_CHARS;
use crate::data::types::SuggestionRecord;
use crate::domain::SuggestCache;

#[derive(Clone)]
pub struct SuggestApiState {
    pub lookup: Arc<SuggestCache>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct SuggestQuery {
    /// Exact prefix to complete; matched without case or whitespace folding
    #[validate(length(max = MAX_PREFIX_CHARS, message = "Prefix is too long"))]
    pub q: Option<String>,
}

pub fn routes(lookup: Arc<SuggestCache>) -> Router<()> {
    Router::new()
        .route("/", get(suggest))
        .with_state(SuggestApiState { lookup })
}

/// Ranked suggestions for a prefix
#[utoipa::path(
    get,
    path = "/api/v1/suggest",
    tag = "suggest",
    params(SuggestQuery),
    responses(
        (status = 200, description = "Up to six suggestions, most frequent first", body = Vec<SuggestionRecord>),
        (status = 400, description = "Missing, empty or oversized prefix"),
        (status = 500, description = "Cache or store failure")
    )
)]
pub async fn suggest(
    State(state): State<SuggestApiState>,
    ValidatedQuery(query): ValidatedQuery<SuggestQuery>,
) -> Result<Json<Vec<SuggestionRecord>>, ApiError> {
    let prefix = query.q.unwrap_or_default();
    let suggestions = state
        .lookup
        .lookup(&prefix)
        .await
        .map_err(ApiError::from_lookup)?;
    Ok(Json(suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::core::config::{CacheBackendType, CacheConfig, EvictionPolicy};
    use crate::data::cache::CacheService;
    use crate::data::types::PrefixDocument;
    use crate::data::{PrefixStore, SqliteService};

    async fn router() -> Router {
        let store: Arc<dyn PrefixStore> =
            Arc::new(Arc::new(SqliteService::open_in_memory().await.unwrap()));
        store
            .upsert_document(&PrefixDocument::new(
                "ca",
                vec![
                    SuggestionRecord::new("cat", 10),
                    SuggestionRecord::new("cards", 9),
                ],
            ))
            .await
            .unwrap();
        store
            .upsert_document(&PrefixDocument::new(
                "caf\u{e9}",
                vec![SuggestionRecord::new("caf\u{e9} au lait", 4)],
            ))
            .await
            .unwrap();

        let cache = CacheService::new(&CacheConfig {
            backend: CacheBackendType::Memory,
            max_entries: 100,
            eviction_policy: EvictionPolicy::TinyLfu,
            redis_url: None,
        })
        .await
        .unwrap();

        routes(Arc::new(SuggestCache::new(Arc::new(cache), store)))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_suggest_returns_ranked_list() {
        let (status, body) = get_json(router().await, "/?q=ca").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([
                {"query": "cat", "frequency": 10},
                {"query": "cards", "frequency": 9}
            ])
        );
    }

    #[tokio::test]
    async fn test_suggest_unknown_prefix_is_empty() {
        let (status, body) = get_json(router().await, "/?q=xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_suggest_percent_encoded_prefix() {
        let (status, body) = get_json(router().await, "/?q=caf%C3%A9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["query"], "caf\u{e9} au lait");
    }

    #[tokio::test]
    async fn test_missing_prefix_rejected() {
        let (status, body) = get_json(router().await, "/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PREFIX");

        let (status, body) = get_json(router().await, "/?q=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PREFIX");
    }

    #[tokio::test]
    async fn test_oversized_prefix_rejected() {
        let uri = format!("/?q={}", "a".repeat(MAX_PREFIX_CHARS as usize + 1));
        let (status, body) = get_json(router().await, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
