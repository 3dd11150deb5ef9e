use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::UploadReceipt,
    routes::AppState,
    services::uploads,
};

/// Request body ceiling for poster uploads
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field carrying the image
const FILE_FIELD: &str = "file";

fn malformed(error: impl std::fmt::Display) -> AppError {
    AppError::InvalidInput(format!("Malformed upload: {}", error))
}

/// Handler for poster uploads (multipart, image in the `file` field)
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadReceipt>> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let body = field.bytes().await.map_err(malformed)?;

        let receipt = uploads::upload_poster(
            state.posters.as_ref(),
            &file_name,
            content_type.as_deref(),
            body,
        )
        .await?;

        tracing::info!(
            request_id = %request_id,
            key = %receipt.key,
            "Poster uploaded"
        );

        return Ok(Json(receipt));
    }

    Err(AppError::InvalidInput("No file provided".to_string()))
}
