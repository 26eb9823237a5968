//! Analytics endpoints: period reports and memory classification.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use sentira_types::report::{EmotionClassification, PeriodReport, PeriodType};

use crate::http::error::AppError;
use crate::state::AppState;

const DEFAULT_CLASSIFICATION_WINDOW_DAYS: i64 = 30;

/// GET /api/v1/users/{id}/reports/{period}
pub async fn get_report(
    State(state): State<AppState>,
    Path((user_id, period)): Path<(String, String)>,
) -> Result<Json<PeriodReport>, AppError> {
    let period: PeriodType = period
        .parse()
        .map_err(|e: String| AppError::Validation(e))?;
    Ok(Json(state.reports.generate_report(&user_id, period).await?))
}

#[derive(Deserialize)]
pub struct ClassificationQuery {
    pub days: Option<i64>,
}

/// GET /api/v1/users/{id}/memories/classification?days=30
pub async fn classify_memories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ClassificationQuery>,
) -> Result<Json<EmotionClassification>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_CLASSIFICATION_WINDOW_DAYS);
    if days <= 0 {
        return Err(AppError::Validation("days must be positive".to_string()));
    }
    Ok(Json(
        state
            .reports
            .classify_memories_by_emotion(&user_id, days)
            .await?,
    ))
}
