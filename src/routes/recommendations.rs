use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{ContentFilter, MediaItem, MediaKind, RecommendationResult},
    routes::AppState,
    services::catalog,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// The title to find similar titles for
    pub item: MediaItem,
    #[serde(default)]
    pub content_type: ContentFilter,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub content_type: ContentFilter,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Apply the configured default and ceiling to a requested limit
pub fn resolve_limit(state: &AppState, requested: Option<usize>) -> AppResult<usize> {
    let limit = requested.unwrap_or(state.default_limit);
    if limit > state.max_limit {
        return Err(AppError::InvalidInput(format!(
            "Limit must be at most {}",
            state.max_limit
        )));
    }
    Ok(limit)
}

async fn respond(
    state: &AppState,
    request_id: RequestId,
    item: &MediaItem,
    content_type: ContentFilter,
    limit: usize,
) -> Json<Vec<RecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        media_id = item.id,
        kind = %item.kind,
        content_type = content_type.as_path(),
        limit = limit,
        "Processing recommendation request"
    );

    let results = state
        .recommendations
        .recommend(item, content_type, limit)
        .await;

    tracing::info!(
        request_id = %request_id,
        returned = results.len(),
        "Recommendations completed"
    );

    Json(results)
}

/// Handler for recommendations against a title supplied in the body
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RecommendationResult>>> {
    let limit = resolve_limit(&state, request.limit)?;
    Ok(respond(&state, request_id, &request.item, request.content_type, limit).await)
}

/// Handler for recommendations against a title looked up by id
pub async fn recommend_for_title(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((kind, id)): Path<(MediaKind, u64)>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationResult>>> {
    let limit = resolve_limit(&state, params.limit)?;
    let item = catalog::details(state.provider.as_ref(), kind, id).await?;
    Ok(respond(&state, request_id, &item, params.content_type, limit).await)
}
