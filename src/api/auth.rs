use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CurrentUserDto, UserDto};
use crate::services::Registration;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .auth()
        .register(Registration {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            reason: payload.reason,
        })
        .await?;

    tracing::info!(email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// POST /api/login
/// Unknown email and wrong password produce distinct messages, both 400.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth().login(&payload.email, &payload.password).await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// GET /api/user
/// There is no server-side session; this always reports no identity.
pub async fn current_user() -> Json<ApiResponse<CurrentUserDto>> {
    Json(ApiResponse::success(CurrentUserDto { user: None }))
}
