/// TMDB (The Movie Database) provider
///
/// Authenticates with a v4 read access token sent as a bearer header. Movie and
/// show endpoints share a shape, so most calls only differ by the kind path
/// segment:
///
/// - `/{kind}/popular`, `/{kind}/{id}`, `/{kind}/{id}/similar`,
///   `/{kind}/{id}/recommendations`, `/{kind}/{id}/videos`
/// - `/discover/{kind}`, `/search/{kind|multi}`, `/trending/{kind|all}/{window}`
/// - `/genre/{kind}/list`
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        media_item_from_tagged, ContentFilter, Genre, MediaItem, MediaKind, Page, TmdbGenreList,
        TmdbMovie, TmdbShow, TmdbVideoList, TrendingWindow, Video,
    },
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    /// Creates a new TMDB provider
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "TMDB API key cannot be empty".to_string(),
            ));
        }

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(config.tmdb_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// GET a TMDB path and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .query(&[("language", self.language.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!("TMDB resource {}", path)));
            }
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    /// Fetch a single-kind listing and normalize it
    async fn kind_page(
        &self,
        kind: MediaKind,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Page<MediaItem>> {
        let page = match kind {
            MediaKind::Movie => self
                .get_json::<Page<TmdbMovie>>(path, params)
                .await?
                .map(MediaItem::from),
            MediaKind::Tv => self
                .get_json::<Page<TmdbShow>>(path, params)
                .await?
                .map(MediaItem::from),
        };

        tracing::debug!(
            path = %path,
            results = page.results.len(),
            provider = "tmdb",
            "Listing fetched"
        );

        Ok(page)
    }

    /// Fetch a listing whose entries are tagged with `media_type`
    async fn mixed_page(&self, path: &str, params: &[(&str, String)]) -> AppResult<Page<MediaItem>> {
        let raw: Page<serde_json::Value> = self.get_json(path, params).await?;
        let page = raw.map(media_item_from_tagged);

        Ok(Page {
            results: page.results.into_iter().flatten().collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
        })
    }
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}

/// Comma-joined genre ids, the AND form `with_genres` expects
pub fn genre_filter(genre_ids: &[u32]) -> String {
    genre_ids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Keep only trailers and clips hosted on YouTube
pub fn youtube_only(videos: Vec<Video>) -> Vec<Video> {
    videos
        .into_iter()
        .filter(|video| video.site == "YouTube")
        .collect()
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn popular(&self, kind: MediaKind, page: u32) -> AppResult<Page<MediaItem>> {
        let path = format!("/{}/popular", kind.as_path());
        self.kind_page(kind, &path, &[page_param(page)]).await
    }

    async fn details(&self, kind: MediaKind, id: u64) -> AppResult<MediaItem> {
        let path = format!("/{}/{}", kind.as_path(), id);
        let item = match kind {
            MediaKind::Movie => MediaItem::from(self.get_json::<TmdbMovie>(&path, &[]).await?),
            MediaKind::Tv => MediaItem::from(self.get_json::<TmdbShow>(&path, &[]).await?),
        };

        tracing::info!(
            media_id = id,
            kind = %kind,
            provider = "tmdb",
            "Details fetched"
        );

        Ok(item)
    }

    async fn discover(
        &self,
        kind: MediaKind,
        genre_ids: Vec<u32>,
        page: u32,
    ) -> AppResult<Page<MediaItem>> {
        let path = format!("/discover/{}", kind.as_path());
        let params = [
            ("with_genres", genre_filter(&genre_ids)),
            ("sort_by", "popularity.desc".to_string()),
            page_param(page),
        ];
        self.kind_page(kind, &path, &params).await
    }

    async fn search(
        &self,
        query: String,
        scope: ContentFilter,
        page: u32,
    ) -> AppResult<Page<MediaItem>> {
        let params = [("query", query.clone()), page_param(page)];

        let results = match scope {
            ContentFilter::Movie => self.kind_page(MediaKind::Movie, "/search/movie", &params).await?,
            ContentFilter::Tv => self.kind_page(MediaKind::Tv, "/search/tv", &params).await?,
            ContentFilter::All => self.mixed_page("/search/multi", &params).await?,
        };

        tracing::info!(
            query = %query,
            scope = scope.as_path(),
            results = results.results.len(),
            provider = "tmdb",
            "Search completed"
        );

        Ok(results)
    }

    async fn trending(
        &self,
        filter: ContentFilter,
        window: TrendingWindow,
    ) -> AppResult<Page<MediaItem>> {
        let path = format!("/trending/{}/{}", filter.as_path(), window.as_path());
        let mut page = self.mixed_page(&path, &[]).await?;
        // entries of a single-kind trending list are tagged too; keep the filter honest
        page.results.retain(|item| filter.matches(item.kind));
        Ok(page)
    }

    async fn similar(&self, kind: MediaKind, id: u64, page: u32) -> AppResult<Page<MediaItem>> {
        let path = format!("/{}/{}/similar", kind.as_path(), id);
        self.kind_page(kind, &path, &[page_param(page)]).await
    }

    async fn recommended(
        &self,
        kind: MediaKind,
        id: u64,
        page: u32,
    ) -> AppResult<Page<MediaItem>> {
        let path = format!("/{}/{}/recommendations", kind.as_path(), id);
        self.kind_page(kind, &path, &[page_param(page)]).await
    }

    async fn genres(&self, kind: MediaKind) -> AppResult<Vec<Genre>> {
        let path = format!("/genre/{}/list", kind.as_path());
        let list: TmdbGenreList = self.get_json(&path, &[]).await?;
        Ok(list.genres)
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> AppResult<Vec<Video>> {
        let path = format!("/{}/{}/videos", kind.as_path(), id);
        let list: TmdbVideoList = self.get_json(&path, &[]).await?;
        Ok(youtube_only(list.results))
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> TmdbProvider {
        TmdbProvider::new(
            "test_token".to_string(),
            "http://test.local/3/".to_string(),
            "en-US".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn video(id: &str, site: &str) -> Video {
        Video {
            id: id.to_string(),
            key: format!("key-{}", id),
            name: "Official Trailer".to_string(),
            site: site.to_string(),
            video_type: "Trailer".to_string(),
            official: true,
            published_at: None,
        }
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = TmdbProvider::new(
            "  ".to_string(),
            "http://test.local".to_string(),
            "en-US".to_string(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let provider = create_test_provider();
        assert_eq!(
            provider.url("/movie/603/similar"),
            "http://test.local/3/movie/603/similar"
        );
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(create_test_provider().name(), "tmdb");
    }

    #[test]
    fn test_genre_filter_joins_ids() {
        assert_eq!(genre_filter(&[28, 12, 878]), "28,12,878");
        assert_eq!(genre_filter(&[]), "");
    }

    #[test]
    fn test_page_param_never_below_one() {
        assert_eq!(page_param(0), ("page", "1".to_string()));
        assert_eq!(page_param(3), ("page", "3".to_string()));
    }

    #[test]
    fn test_youtube_only() {
        let videos = vec![
            video("a", "YouTube"),
            video("b", "Vimeo"),
            video("c", "YouTube"),
        ];

        let kept = youtube_only(videos);
        let ids: Vec<&str> = kept.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_error() {
        let provider = TmdbProvider::new(
            "test_token".to_string(),
            "http://127.0.0.1:9".to_string(),
            "en-US".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = provider.similar(MediaKind::Movie, 603, 1).await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}
