/// Media metadata provider abstraction
///
/// Browsing and recommendations only talk to this trait, so the upstream catalog
/// (TMDB today) can be swapped or faked in tests.
use crate::{
    error::AppResult,
    models::{ContentFilter, Genre, MediaItem, MediaKind, Page, TrendingWindow, Video},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for media metadata providers
///
/// Every listing returns a single page; callers pick the page number (1-based).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Most popular titles of one kind
    async fn popular(&self, kind: MediaKind, page: u32) -> AppResult<Page<MediaItem>>;

    /// Full record for one title
    async fn details(&self, kind: MediaKind, id: u64) -> AppResult<MediaItem>;

    /// Titles carrying all of the given genres, most popular first
    async fn discover(
        &self,
        kind: MediaKind,
        genre_ids: Vec<u32>,
        page: u32,
    ) -> AppResult<Page<MediaItem>>;

    /// Free-text search. `ContentFilter::All` searches movies and shows together.
    async fn search(
        &self,
        query: String,
        scope: ContentFilter,
        page: u32,
    ) -> AppResult<Page<MediaItem>>;

    async fn trending(
        &self,
        filter: ContentFilter,
        window: TrendingWindow,
    ) -> AppResult<Page<MediaItem>>;

    /// Titles the provider considers similar to `id`
    async fn similar(&self, kind: MediaKind, id: u64, page: u32) -> AppResult<Page<MediaItem>>;

    /// Titles the provider recommends to viewers of `id`
    async fn recommended(&self, kind: MediaKind, id: u64, page: u32)
        -> AppResult<Page<MediaItem>>;

    /// Genre reference data for one kind
    async fn genres(&self, kind: MediaKind) -> AppResult<Vec<Genre>>;

    async fn videos(&self, kind: MediaKind, id: u64) -> AppResult<Vec<Video>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
