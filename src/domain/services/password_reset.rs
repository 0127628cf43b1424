use crate::domain::models::{password_reset::PasswordResetToken, user::User};
use crate::domain::ports::{PasswordResetRepository, UserRepository};
use crate::domain::services::auth_service::{hash_password, validate_password_policy};
use crate::error::AppError;
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::info;

pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

pub struct PasswordResetService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn PasswordResetRepository>,
}

impl PasswordResetService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn PasswordResetRepository>) -> Self {
        Self { users, tokens }
    }

    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Issues a fresh reset token for the given address, replacing any
    /// previous token the user still had. Returns the user and the raw token
    /// so the caller can put it in the reset mail.
    pub async fn issue(&self, email: &str) -> Result<(User, String), AppError> {
        let user = self.users.find_by_email(email).await?
            .ok_or(AppError::NotFound("User not found.".into()))?;

        self.tokens.delete_by_user(&user.id).await?;

        let raw_token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        let record = PasswordResetToken::new(
            user.id.clone(),
            Self::hash_token(&raw_token),
            Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        );
        self.tokens.create(&record).await?;

        info!("Issued password reset token for user {}", user.id);
        Ok((user, raw_token))
    }

    /// Redeems a reset token: tokens are single-use and expire after
    /// [`RESET_TOKEN_TTL_MINUTES`].
    pub async fn redeem(&self, raw_token: &str, new_password: &str) -> Result<User, AppError> {
        let record = self.tokens.find_by_hash(&Self::hash_token(raw_token)).await?
            .ok_or(AppError::NotFound("Invalid token.".into()))?;

        if record.is_expired() {
            self.tokens.delete(&record.id).await?;
            return Err(AppError::Validation("Token expired.".into()));
        }

        validate_password_policy(new_password)?;

        let mut user = self.users.find_by_id(&record.user_id).await?
            .ok_or(AppError::NotFound("User not found.".into()))?;
        user.password_hash = hash_password(new_password)?;
        let user = self.users.update(&user).await?;

        self.tokens.delete(&record.id).await?;

        info!("Password updated via reset token for user {}", user.id);
        Ok(user)
    }
}
