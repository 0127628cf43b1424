use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use crate::domain::models::{auth::Claims, user::{User, ROLE_ADMIN}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::Span;

/// The authenticated principal. The bearer token is verified and the user row
/// is reloaded so a deactivated account is cut off even while its token is
/// still within its lifetime.
pub struct AuthUser {
    pub user: User,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state.auth_service.verify_token(token)?;

        let user = app_state
            .user_repo
            .find_by_email(&claims.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.active {
            return Err(AppError::Unauthorized);
        }

        Span::current().record("company_id", user.company_id.as_str());
        Span::current().record("user_id", user.id.as_str());

        Ok(AuthUser { user, claims })
    }
}

/// Principal that must carry the ADMIN authority.
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.claims.has_authority(ROLE_ADMIN) {
            return Err(AppError::Forbidden("Access denied".into()));
        }
        Ok(AdminUser(auth))
    }
}
