use crate::domain::{models::user::Role, ports::RoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRoleRepo {
    pool: PgPool,
}

impl PostgresRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepo {
    async fn find_by_authority(&self, authority: &str) -> Result<Option<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT id, authority FROM roles WHERE authority = $1")
            .bind(authority)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
