//! Interaction processing endpoint.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use sentira_core::repository::InteractionRepository;
use sentira_types::emotion::EmotionAnalysisRecord;
use sentira_types::interaction::{InteractionOutcome, InteractionRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/v1/interactions - run one interaction through the pipeline.
pub async fn process_interaction(
    State(state): State<AppState>,
    Json(request): Json<InteractionRequest>,
) -> Result<Json<InteractionOutcome>, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    if request.text.trim().is_empty() && request.image.is_none() {
        return Err(AppError::Validation(
            "text must not be empty unless an image is attached".to_string(),
        ));
    }
    let outcome = state.pipeline.process(request).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/interactions/{id}/analysis - read back a log's stored
/// affect assessment.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(log_id): Path<Uuid>,
) -> Result<Json<EmotionAnalysisRecord>, AppError> {
    state
        .store
        .get_analysis(log_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no analysis for interaction '{log_id}'")))
}
