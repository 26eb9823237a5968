//! User profile endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use sentira_core::repository::UserRepository;
use sentira_types::profile::UserProfile;
use sentira_types::report::UserStatistics;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub user_id: String,
}

/// POST /api/v1/users - create the profile if absent, return it either way.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if body.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    let profile = state.store.ensure_profile(body.user_id.trim()).await?;
    Ok(Json(profile))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    state
        .store
        .get_profile(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))
}

/// GET /api/v1/users/{id}/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatistics>, AppError> {
    Ok(Json(state.store.get_statistics(&user_id).await?))
}
