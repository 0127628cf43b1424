use crate::domain::{models::user::Role, ports::RoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRoleRepo {
    pool: SqlitePool,
}

impl SqliteRoleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for SqliteRoleRepo {
    async fn find_by_authority(&self, authority: &str) -> Result<Option<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT id, authority FROM roles WHERE authority = ?")
            .bind(authority)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
