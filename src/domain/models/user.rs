use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_OPERATOR: &str = "ROLE_OPERATOR";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub photo: Option<Vec<u8>>,
    pub active: bool,
    pub first_access: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New users start active and flagged for their first access.
    pub fn new(company_id: String, name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            name,
            email,
            password_hash,
            photo: None,
            active: true,
            first_access: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Role {
    pub id: String,
    pub authority: String,
}
