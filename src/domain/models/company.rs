use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub cnpj: String,
    #[serde(skip_serializing)]
    pub photo: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: String, cnpj: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            cnpj,
            photo: None,
            created_at: Utc::now(),
        }
    }
}
