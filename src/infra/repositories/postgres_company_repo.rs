use crate::domain::{models::company::Company, ports::CompanyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCompanyRepo {
    pool: PgPool,
}

impl PostgresCompanyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepo {
    async fn create(&self, company: &Company) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, name, cnpj, photo, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING id, name, cnpj, photo, created_at",
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
            "SELECT id, name, cnpj, photo, created_at FROM companies WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, company: &Company) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $1, cnpj = $2, photo = $3 WHERE id = $4 RETURNING id, name, cnpj, photo, created_at",
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
