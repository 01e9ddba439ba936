//! Build trigger endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::types::ApiError;
use crate::domain::BuildPipeline;
use crate::domain::suggest::BuildReportBody;

#[derive(Clone)]
pub struct BuildApiState {
    pub pipeline: Arc<BuildPipeline>,
}

pub fn routes(pipeline: Arc<BuildPipeline>) -> Router<()> {
    Router::new()
        .route("/", post(trigger_build))
        .with_state(BuildApiState { pipeline })
}

/// Run the builder pipeline and wait for it to finish
///
/// A request arriving during another build waits for it, then runs its own.
#[utoipa::path(
    post,
    path = "/api/v1/build",
    tag = "build",
    responses(
        (status = 200, description = "Build completed", body = BuildReportBody),
        (status = 500, description = "Writing prefix documents failed"),
        (status = 503, description = "Corpus supplier unavailable or payload invalid")
    )
)]
pub async fn trigger_build(
    State(state): State<BuildApiState>,
) -> Result<Json<BuildReportBody>, ApiError> {
    let report = state.pipeline.run().await.map_err(ApiError::from_build)?;
    Ok(Json(BuildReportBody::from(&report)))
}
