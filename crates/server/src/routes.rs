use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::parents::ParentStore;

pub mod parents;

/// Shared handler state, injected explicitly rather than via globals.
#[derive(Clone)]
pub struct ServerState {
    pub parent_store: Arc<ParentStore>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
///
/// The singular/plural asymmetry (`POST /parent` vs `GET /parents`) is the
/// published surface and is kept as-is.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/parents", get(parents::list_parents))
        .route("/parents/:id", get(parents::get_parent))
        .route("/profiles", get(parents::list_profiles))
        .route("/parent", post(parents::create_parent))
        .route(
            "/parent/:id",
            put(parents::update_parent).delete(parents::delete_parent),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
