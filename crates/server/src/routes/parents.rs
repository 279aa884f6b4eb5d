use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use models::{NewParent, Parent, ParentUpdate, Profile};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// List all parents, ordered by id.
pub async fn list_parents(State(state): State<ServerState>) -> Json<Vec<Parent>> {
    Json(state.parent_store.list().await)
}

/// Create a parent; responds 201 with the bare new id as the body.
/// A body that fails to deserialize (missing/unknown fields, wrong types)
/// is reported as `InvalidParent` rather than axum's default rejection.
pub async fn create_parent(
    State(state): State<ServerState>,
    payload: Result<Json<NewParent>, JsonRejection>,
) -> Result<(StatusCode, Json<u64>), ApiError> {
    let Json(input) = payload.map_err(|_| ApiError::invalid_parent())?;
    let id = state.parent_store.create(input).await?;
    info!(id, "parent created");
    Ok((StatusCode::CREATED, Json(id)))
}

/// Fetch a single parent by id.
pub async fn get_parent(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> Result<Json<Parent>, ApiError> {
    match state.parent_store.get(id).await {
        Some(rec) => Ok(Json(rec)),
        None => Err(ApiError::parent_not_found()),
    }
}

/// List the derived profile views across all parents.
pub async fn list_profiles(State(state): State<ServerState>) -> Json<Vec<Profile>> {
    Json(state.parent_store.profiles().await)
}

/// Apply a partial update; responds 204 with an empty body.
pub async fn update_parent(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    payload: Result<Json<ParentUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(patch) = payload.map_err(|_| ApiError::invalid_parent())?;
    state.parent_store.update(id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a parent; responds 204 with an empty body.
pub async fn delete_parent(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.parent_store.remove(id).await?;
    info!(id, "parent deleted");
    Ok(StatusCode::NO_CONTENT)
}
