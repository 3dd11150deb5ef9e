use axum::body::Bytes;
use chrono::Utc;

use crate::{error::AppResult, models::UploadReceipt, services::storage::PosterStorage};

/// Content type recorded when the upload doesn't declare one
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

const FALLBACK_FILE_NAME: &str = "poster";

/// Object key for a poster: `posters/{millis}-{file name}`
///
/// Only the last path segment of the client's file name is kept.
pub fn poster_key(timestamp_millis: i64, file_name: &str) -> String {
    let name = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME);

    format!("posters/{}-{}", timestamp_millis, name)
}

/// Store a poster and report where it landed
pub async fn upload_poster(
    storage: &dyn PosterStorage,
    file_name: &str,
    content_type: Option<&str>,
    body: Bytes,
) -> AppResult<UploadReceipt> {
    let key = poster_key(Utc::now().timestamp_millis(), file_name);
    let content_type = content_type
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    storage.put(&key, body, content_type).await?;

    Ok(UploadReceipt {
        success: true,
        url: storage.public_url(&key),
        key,
    })
}
