use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DailyVisitsDto, MessageResponse, WeeklyStatsDto};

#[derive(Deserialize)]
pub struct UpdateStatsRequest {
    pub page: Option<String>,
}

/// POST /api/update-stats
pub async fn update_stats(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateStatsRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let page = payload
        .page
        .ok_or_else(|| ApiError::validation("Please provide a page name"))?;

    state.stats().record_visit(&page).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Visit recorded".to_string(),
    })))
}

/// GET /api/stats
/// The weekly dashboard read; under the default fail-open policy a store
/// failure yields zeros with a 200 instead of an error.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<WeeklyStatsDto>>, ApiError> {
    let weekly = state.stats().weekly().await?;

    Ok(Json(ApiResponse::success(WeeklyStatsDto {
        total_visits: weekly.total_visits,
        pages: weekly.pages.into_iter().map(DailyVisitsDto::from).collect(),
    })))
}
