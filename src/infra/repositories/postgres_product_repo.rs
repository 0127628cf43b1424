use crate::domain::{models::{category::Category, product::Product}, ports::ProductRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::error;

pub struct PostgresProductRepo {
    pool: PgPool,
}

impl PostgresProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_product(row: &PgRow) -> Result<Product, AppError> {
    Ok(Product {
        id: row.try_get("id").map_err(AppError::Database)?,
        company_id: row.try_get("company_id").map_err(AppError::Database)?,
        name: row.try_get("name").map_err(AppError::Database)?,
        description: row.try_get("description").map_err(AppError::Database)?,
        quantity: row.try_get("quantity").map_err(AppError::Database)?,
        critical_quantity: row.try_get("critical_quantity").map_err(AppError::Database)?,
        unit_value: row.try_get("unit_value").map_err(AppError::Database)?,
        stock_value: row.try_get("stock_value").map_err(AppError::Database)?,
        photo: row.try_get("photo").map_err(AppError::Database)?,
        created_at: row.try_get("created_at").map_err(AppError::Database)?,
    })
}

#[async_trait]
impl ProductRepository for PostgresProductRepo {
    async fn create(&self, product: &Product, category_ids: &[String]) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO products (id, company_id, name, description, quantity, critical_quantity, unit_value, stock_value, photo, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
            .bind(&product.id)
            .bind(&product.company_id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.quantity)
            .bind(product.critical_quantity)
            .bind(product.unit_value)
            .bind(product.stock_value)
            .bind(&product.photo)
            .bind(product.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for category_id in category_ids {
            sqlx::query("INSERT INTO product_categories (product_id, category_id) VALUES ($1, $2)")
                .bind(&product.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(product.clone())
    }

    async fn update(&self, product: &Product, category_ids: &[String]) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "UPDATE products SET name = $1, description = $2, quantity = $3, critical_quantity = $4, unit_value = $5, stock_value = $6, photo = $7 \
             WHERE company_id = $8 AND id = $9",
        )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.quantity)
            .bind(product.critical_quantity)
            .bind(product.unit_value)
            .bind(product.stock_value)
            .bind(&product.photo)
            .bind(&product.company_id)
            .bind(&product.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(&product.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for category_id in category_ids {
            sqlx::query("INSERT INTO product_categories (product_id, category_id) VALUES ($1, $2)")
                .bind(&product.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(product.clone())
    }

    async fn find_by_id(&self, company_id: &str, id: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query("SELECT * FROM products WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        row.as_ref().map(map_product).transpose()
    }

    async fn categories_of(&self, product_id: &str) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT c.id, c.company_id, c.name, c.created_at FROM categories c \
             JOIN product_categories pc ON pc.category_id = c.id \
             WHERE pc.product_id = $1 ORDER BY c.name ASC",
        )
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_paged(
        &self,
        company_id: &str,
        category_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query(
            "SELECT * FROM products p WHERE p.company_id = $1 \
             AND ($2::TEXT IS NULL OR EXISTS (SELECT 1 FROM product_categories pc WHERE pc.product_id = p.id AND pc.category_id = $2)) \
             ORDER BY p.name ASC LIMIT $3 OFFSET $4",
        )
            .bind(company_id)
            .bind(category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        rows.iter().map(map_product).collect()
    }

    async fn count(&self, company_id: &str, category_id: Option<&str>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products p WHERE p.company_id = $1 \
             AND ($2::TEXT IS NULL OR EXISTS (SELECT 1 FROM product_categories pc WHERE pc.product_id = p.id AND pc.category_id = $2))",
        )
            .bind(company_id)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM products WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres product deletion failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }
}
