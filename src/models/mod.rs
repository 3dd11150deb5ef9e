use serde::Deserialize;

mod media;
mod recommendation;
mod upload;
mod user;

pub use media::{ContentFilter, Genre, MediaItem, MediaKind, Page, TrendingWindow, Video};
pub use recommendation::{FactorScores, RecommendationResult};
pub use upload::UploadReceipt;
pub use user::UserProfile;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Movie record as returned by TMDB list and detail endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    /// Only present on detail responses, which carry genre objects instead of ids
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

/// TV show record as returned by TMDB list and detail endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbShow {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

fn genre_ids(ids: Option<Vec<u32>>, genres: Option<Vec<Genre>>) -> Vec<u32> {
    match ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => genres
            .unwrap_or_default()
            .into_iter()
            .map(|genre| genre.id)
            .collect(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TmdbMovie> for MediaItem {
    fn from(movie: TmdbMovie) -> Self {
        MediaItem {
            id: movie.id,
            kind: MediaKind::Movie,
            title: movie.title.unwrap_or_default(),
            overview: movie.overview.unwrap_or_default(),
            genre_ids: genre_ids(movie.genre_ids, movie.genres),
            rating: movie.vote_average.unwrap_or(0.0),
            vote_count: movie.vote_count.unwrap_or(0),
            popularity: movie.popularity.unwrap_or(0.0),
            release_date: non_empty(movie.release_date),
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            original_language: movie.original_language.unwrap_or_default(),
        }
    }
}

impl From<TmdbShow> for MediaItem {
    fn from(show: TmdbShow) -> Self {
        MediaItem {
            id: show.id,
            kind: MediaKind::Tv,
            title: show.name.unwrap_or_default(),
            overview: show.overview.unwrap_or_default(),
            genre_ids: genre_ids(show.genre_ids, show.genres),
            rating: show.vote_average.unwrap_or(0.0),
            vote_count: show.vote_count.unwrap_or(0),
            popularity: show.popularity.unwrap_or(0.0),
            release_date: non_empty(show.first_air_date),
            poster_path: show.poster_path,
            backdrop_path: show.backdrop_path,
            original_language: show.original_language.unwrap_or_default(),
        }
    }
}

/// Convert one entry of a mixed-kind listing (multi search, trending).
///
/// Entries are tagged with `media_type`; people and anything unknown are skipped.
pub fn media_item_from_tagged(value: serde_json::Value) -> Option<MediaItem> {
    match value.get("media_type").and_then(|t| t.as_str()) {
        Some("movie") => serde_json::from_value::<TmdbMovie>(value)
            .map(MediaItem::from)
            .ok(),
        Some("tv") => serde_json::from_value::<TmdbShow>(value)
            .map(MediaItem::from)
            .ok(),
        _ => None,
    }
}

/// Response body of the TMDB genre list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Response body of the TMDB videos endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}
