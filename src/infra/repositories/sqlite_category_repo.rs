use crate::domain::{models::category::Category, ports::CategoryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::error;

pub struct SqliteCategoryRepo {
    pool: SqlitePool,
}

impl SqliteCategoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepo {
    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, company_id, name, created_at) VALUES (?, ?, ?, ?) RETURNING id, company_id, name, created_at",
        )
            .bind(&category.id)
            .bind(&category.company_id)
            .bind(&category.name)
            .bind(category.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, company_id: &str, id: &str) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, company_id, name, created_at FROM categories WHERE company_id = ? AND id = ?",
        )
            .bind(company_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, company_id, name, created_at FROM categories WHERE company_id = ? ORDER BY name ASC",
        )
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM categories WHERE company_id = ? AND id = ?")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite category deletion failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }
}
