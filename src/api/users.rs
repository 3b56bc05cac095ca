//! CRUD endpoints over the JSON-file user records

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{UserCandidate, UserRecord};

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    debug!("Listing user records");

    let records = state.users.list().await?;
    Ok(Json(records))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Option<Json<UserCandidate>>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    debug!("Creating user record");

    let record = state.users.create(payload.map(Json::into_inner)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<Json<UserCandidate>>,
) -> Result<Json<UserRecord>, ApiError> {
    debug!(id = %id, "Updating user record");

    let candidate = payload.map(Json::into_inner).unwrap_or_default();
    let record = state.users.update(&id, candidate).await?;

    Ok(Json(record))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(id = %id, "Deleting user record");

    state.users.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
