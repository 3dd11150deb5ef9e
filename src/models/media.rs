use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Kind of title. Ids are only unique within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment TMDB uses for this kind
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// Which kinds of titles a listing should keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    Movie,
    Tv,
    #[default]
    All,
}

impl ContentFilter {
    pub fn matches(&self, kind: MediaKind) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Movie => kind == MediaKind::Movie,
            ContentFilter::Tv => kind == MediaKind::Tv,
        }
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            ContentFilter::Movie => "movie",
            ContentFilter::Tv => "tv",
            ContentFilter::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_path(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// A movie or TV show as used for browsing and scoring.
///
/// Incomplete upstream records are normalized on the way in: missing numbers
/// become 0, missing text becomes empty and missing genres an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Average vote on a 0-10 scale
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    /// `YYYY-MM-DD` release (movies) or first air date (shows)
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub original_language: String,
}

impl MediaItem {
    /// Release year, if one can be read from the release date
    pub fn year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        if date.is_empty() {
            return None;
        }

        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed.year());
        }

        date.parse::<i32>().ok()
    }
}

/// Genre reference data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A trailer or clip attached to a title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Convert every result, keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_date(date: Option<&str>) -> MediaItem {
        MediaItem {
            id: 1,
            kind: MediaKind::Movie,
            title: "Inception".to_string(),
            overview: String::new(),
            genre_ids: vec![],
            rating: 0.0,
            vote_count: 0,
            popularity: 0.0,
            release_date: date.map(str::to_string),
            poster_path: None,
            backdrop_path: None,
            original_language: String::new(),
        }
    }

    #[test]
    fn test_year_from_full_date() {
        assert_eq!(item_with_date(Some("2010-07-16")).year(), Some(2010));
    }

    #[test]
    fn test_year_from_bare_year() {
        assert_eq!(item_with_date(Some("1999")).year(), Some(1999));
    }

    #[test]
    fn test_year_missing_or_garbage() {
        assert_eq!(item_with_date(None).year(), None);
        assert_eq!(item_with_date(Some("")).year(), None);
        assert_eq!(item_with_date(Some("soon")).year(), None);
    }

    #[test]
    fn test_content_filter_matches() {
        assert!(ContentFilter::All.matches(MediaKind::Movie));
        assert!(ContentFilter::All.matches(MediaKind::Tv));
        assert!(ContentFilter::Movie.matches(MediaKind::Movie));
        assert!(!ContentFilter::Movie.matches(MediaKind::Tv));
        assert!(ContentFilter::Tv.matches(MediaKind::Tv));
        assert!(!ContentFilter::Tv.matches(MediaKind::Movie));
    }

    #[test]
    fn test_media_kind_serialization() {
        assert_eq!(serde_json::to_string(&MediaKind::Tv).unwrap(), "\"tv\"");
        let kind: MediaKind = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(kind, MediaKind::Movie);
    }

    #[test]
    fn test_media_item_defaults_missing_fields() {
        let item: MediaItem =
            serde_json::from_str(r#"{"id": 27205, "kind": "movie", "title": "Inception"}"#)
                .unwrap();

        assert_eq!(item.rating, 0.0);
        assert_eq!(item.popularity, 0.0);
        assert!(item.overview.is_empty());
        assert!(item.genre_ids.is_empty());
        assert_eq!(item.year(), None);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page {
            page: 2,
            results: vec![1, 2, 3],
            total_pages: 7,
            total_results: 130,
        };

        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.results, vec![10, 20, 30]);
        assert_eq!(mapped.total_pages, 7);
        assert_eq!(mapped.total_results, 130);
    }

    #[test]
    fn test_video_type_rename() {
        let video: Video = serde_json::from_str(
            r#"{"id": "v1", "key": "YoHD9XEInc0", "name": "Trailer", "site": "YouTube", "type": "Trailer"}"#,
        )
        .unwrap();
        assert_eq!(video.video_type, "Trailer");
        assert!(!video.official);
    }
}
