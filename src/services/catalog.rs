/// Browse operations
///
/// Thin service functions over a MetadataProvider that validate input before
/// delegating, keeping HTTP routing separate from provider calls.
use crate::{
    error::{AppError, AppResult},
    models::{ContentFilter, Genre, MediaItem, MediaKind, Page, TrendingWindow, Video},
    services::providers::MetadataProvider,
};
use std::collections::HashSet;

fn validate_page(page: u32) -> AppResult<u32> {
    if page == 0 {
        return Err(AppError::InvalidInput(
            "Page must be at least 1".to_string(),
        ));
    }
    Ok(page)
}

pub async fn popular(
    provider: &dyn MetadataProvider,
    kind: MediaKind,
    page: u32,
) -> AppResult<Page<MediaItem>> {
    provider.popular(kind, validate_page(page)?).await
}

pub async fn details(
    provider: &dyn MetadataProvider,
    kind: MediaKind,
    id: u64,
) -> AppResult<MediaItem> {
    provider.details(kind, id).await
}

pub async fn discover(
    provider: &dyn MetadataProvider,
    kind: MediaKind,
    genre_ids: Vec<u32>,
    page: u32,
) -> AppResult<Page<MediaItem>> {
    provider.discover(kind, genre_ids, validate_page(page)?).await
}

pub async fn search(
    provider: &dyn MetadataProvider,
    query: &str,
    scope: ContentFilter,
    page: u32,
) -> AppResult<Page<MediaItem>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    provider
        .search(query.to_string(), scope, validate_page(page)?)
        .await
}

pub async fn trending(
    provider: &dyn MetadataProvider,
    filter: ContentFilter,
    window: TrendingWindow,
) -> AppResult<Page<MediaItem>> {
    provider.trending(filter, window).await
}

/// YouTube videos for a title. Upstream failures yield an empty list.
pub async fn videos(provider: &dyn MetadataProvider, kind: MediaKind, id: u64) -> Vec<Video> {
    match provider.videos(kind, id).await {
        Ok(videos) => videos,
        Err(e) => {
            tracing::warn!(
                error = %e,
                media_id = id,
                kind = %kind,
                provider = provider.name(),
                "Video fetch failed"
            );
            Vec::new()
        }
    }
}

/// Movie and show genres, deduplicated by id and sorted by name.
///
/// Both lists are fetched concurrently. If either fetch fails the result is empty.
pub async fn genres(provider: &dyn MetadataProvider) -> Vec<Genre> {
    let (movie_genres, tv_genres) = tokio::join!(
        provider.genres(MediaKind::Movie),
        provider.genres(MediaKind::Tv)
    );

    match (movie_genres, tv_genres) {
        (Ok(movie_genres), Ok(tv_genres)) => merge_genres(movie_genres, tv_genres),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(
                error = %e,
                provider = provider.name(),
                "Genre fetch failed"
            );
            Vec::new()
        }
    }
}

fn merge_genres(first: Vec<Genre>, second: Vec<Genre>) -> Vec<Genre> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Genre> = first
        .into_iter()
        .chain(second)
        .filter(|genre| seen.insert(genre.id))
        .collect();

    merged.sort_by(|a, b| a.name.cmp(&b.name));
    merged
}
