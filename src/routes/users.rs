use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::AppResult, models::UserProfile, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Register a user
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let user = state.users.create(&request.name, &request.email).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.users.get(id).await?))
}

/// Add or remove a title from the user's favorites
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(Uuid, u64)>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.users.toggle_favorite(id, item_id).await?))
}
