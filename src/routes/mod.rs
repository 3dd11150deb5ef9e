use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::UserRepository,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::MetadataProvider, recommendations::RecommendationService, scorer::Scorer,
        storage::PosterStorage,
    },
};

pub mod catalog;
pub mod recommendations;
pub mod uploads;
pub mod users;

/// Shared state handed to every handler
pub struct AppState {
    pub provider: Arc<dyn MetadataProvider>,
    pub recommendations: RecommendationService,
    pub users: Arc<dyn UserRepository>,
    pub posters: Arc<dyn PosterStorage>,
    /// Limit used when a recommendation request doesn't carry one
    pub default_limit: usize,
    pub max_limit: usize,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        users: Arc<dyn UserRepository>,
        posters: Arc<dyn PosterStorage>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        Self {
            recommendations: RecommendationService::new(provider.clone(), Scorer::new()),
            provider,
            users,
            posters,
            default_limit,
            max_limit,
        }
    }
}

/// Creates the application router with all routes
///
/// Every request gets a request id first, so the trace span can carry it.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Browse
        .route("/genres", get(catalog::genres))
        .route("/popular/:kind", get(catalog::popular))
        .route("/titles/:kind/:id", get(catalog::details))
        .route("/titles/:kind/:id/videos", get(catalog::videos))
        .route("/discover/:kind", get(catalog::discover))
        .route("/search", get(catalog::search))
        .route("/trending/:filter/:window", get(catalog::trending))
        // Recommendations
        .route("/recommendations", post(recommendations::recommend))
        .route(
            "/titles/:kind/:id/recommendations",
            get(recommendations::recommend_for_title),
        )
        // Users
        .route("/users", post(users::create))
        .route("/users/:id", get(users::get))
        .route(
            "/users/:id/favorites/:item_id",
            post(users::toggle_favorite),
        )
        // Uploads
        .route(
            "/upload",
            post(uploads::upload).layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES)),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
