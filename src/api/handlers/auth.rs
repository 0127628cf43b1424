use axum::{extract::State, response::IntoResponse, Form, Json};
use crate::api::dtos::requests::TokenRequest;
use crate::domain::services::auth_service::verify_password;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

/// OAuth2-style password grant. Accepts a form-encoded body with
/// `grant_type=password` and returns a bearer access token.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.grant_type != "password" {
        return Err(AppError::Validation("Unsupported grant_type, expected \"password\".".into()));
    }

    let user = state.user_repo.find_by_email(&payload.username).await?
        .ok_or_else(|| {
            warn!("Login failed for {}: unknown user", payload.username);
            AppError::Unauthorized
        })?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!("Login failed for {}: bad credentials", payload.username);
        return Err(AppError::Unauthorized);
    }

    if !user.active {
        warn!("Login failed for {}: account deactivated", payload.username);
        return Err(AppError::Unauthorized);
    }

    let roles = state.user_repo.roles_of(&user.id).await?;
    let authorities: Vec<String> = roles.into_iter().map(|r| r.authority).collect();

    let token = state.auth_service.issue_token(&user, &authorities)?;

    info!("User {} logged in", user.email);
    Ok(Json(token))
}
