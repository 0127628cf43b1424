use crate::domain::{models::company::Company, ports::CompanyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCompanyRepo {
    pool: SqlitePool,
}

impl SqliteCompanyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for SqliteCompanyRepo {
    async fn create(&self, company: &Company) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, name, cnpj, photo, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id, name, cnpj, photo, created_at",
        )
            .bind(&company.id)
            .bind(&company.name)
            .bind(&company.cnpj)
            .bind(&company.photo)
            .bind(company.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError> {
        sqlx::query_as::<_, Company>(
            "SELECT id, name, cnpj, photo, created_at FROM companies WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, company: &Company) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = ?, cnpj = ?, photo = ? WHERE id = ? RETURNING id, name, cnpj, photo, created_at",
        )
            .bind(&company.name)
            .bind(&company.cnpj)
            .bind(&company.photo)
            .bind(&company.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
