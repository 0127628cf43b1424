use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{PasswordResetConfirmRequest, PasswordResetRequest};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn request_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, raw_token) = state.reset_service.issue(&payload.email).await?;

    state.notifications.send_password_reset(&user, &raw_token);

    info!("Password reset requested for {}", payload.email);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PasswordResetConfirmRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.reset_service.redeem(&payload.token, &payload.new_password).await?;

    info!("Password reset completed for {}", user.email);
    Ok(StatusCode::NO_CONTENT)
}
