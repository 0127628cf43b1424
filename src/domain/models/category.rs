use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Category {
    pub id: String,
    #[serde(skip_serializing)]
    pub company_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(company_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            name,
            created_at: Utc::now(),
        }
    }
}
