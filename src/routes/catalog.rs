use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{ContentFilter, Genre, MediaItem, MediaKind, Page, TrendingWindow, Video},
    routes::AppState,
    services::catalog,
};

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    /// Comma-separated genre ids, e.g. `28,12`
    #[serde(default)]
    genres: String,
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default)]
    scope: ContentFilter,
    #[serde(default = "first_page")]
    page: u32,
}

/// Parse a comma-separated genre id list, ignoring empty entries
pub fn parse_genre_ids(raw: &str) -> AppResult<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| AppError::InvalidInput(format!("Invalid genre id: {}", part)))
        })
        .collect()
}

/// Handler for the combined genre list
pub async fn genres(State(state): State<Arc<AppState>>) -> Json<Vec<Genre>> {
    Json(catalog::genres(state.provider.as_ref()).await)
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<MediaKind>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<MediaItem>>> {
    let page = catalog::popular(state.provider.as_ref(), kind, params.page).await?;
    Ok(Json(page))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(MediaKind, u64)>,
) -> AppResult<Json<MediaItem>> {
    let item = catalog::details(state.provider.as_ref(), kind, id).await?;
    Ok(Json(item))
}

pub async fn videos(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(MediaKind, u64)>,
) -> Json<Vec<Video>> {
    Json(catalog::videos(state.provider.as_ref(), kind, id).await)
}

pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<MediaKind>,
    Query(params): Query<DiscoverQuery>,
) -> AppResult<Json<Page<MediaItem>>> {
    let genre_ids = parse_genre_ids(&params.genres)?;
    let page = catalog::discover(state.provider.as_ref(), kind, genre_ids, params.page).await?;
    Ok(Json(page))
}

/// Handler for title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Page<MediaItem>>> {
    let page = catalog::search(
        state.provider.as_ref(),
        &params.q,
        params.scope,
        params.page,
    )
    .await?;
    Ok(Json(page))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Path((filter, window)): Path<(ContentFilter, TrendingWindow)>,
) -> AppResult<Json<Page<MediaItem>>> {
    let page = catalog::trending(state.provider.as_ref(), filter, window).await?;
    Ok(Json(page))
}
