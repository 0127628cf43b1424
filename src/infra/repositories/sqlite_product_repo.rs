use crate::domain::{models::{category::Category, product::Product}, ports::ProductRepository};
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::str::FromStr;
use tracing::error;

pub struct SqliteProductRepo {
    pool: SqlitePool,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Money columns are stored as TEXT on SQLite; both values are written by us,
// so a parse failure means the row is corrupt.
fn map_product(row: &SqliteRow) -> Result<Product, AppError> {
    let unit_value: String = row.try_get("unit_value").map_err(AppError::Database)?;
    let stock_value: String = row.try_get("stock_value").map_err(AppError::Database)?;

    Ok(Product {
        id: row.try_get("id").map_err(AppError::Database)?,
        company_id: row.try_get("company_id").map_err(AppError::Database)?,
        name: row.try_get("name").map_err(AppError::Database)?,
        description: row.try_get("description").map_err(AppError::Database)?,
        quantity: row.try_get("quantity").map_err(AppError::Database)?,
        critical_quantity: row.try_get("critical_quantity").map_err(AppError::Database)?,
        unit_value: Decimal::from_str(&unit_value)
            .map_err(|_| AppError::InternalWithMsg(format!("Invalid stored unit value: {unit_value}")))?,
        stock_value: Decimal::from_str(&stock_value)
            .map_err(|_| AppError::InternalWithMsg(format!("Invalid stored stock value: {stock_value}")))?,
        photo: row.try_get("photo").map_err(AppError::Database)?,
        created_at: row.try_get("created_at").map_err(AppError::Database)?,
    })
}

#[async_trait]
impl ProductRepository for SqliteProductRepo {
    async fn create(&self, product: &Product, category_ids: &[String]) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO products (id, company_id, name, description, quantity, critical_quantity, unit_value, stock_value, photo, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
            .bind(&product.id)
            .bind(&product.company_id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.quantity)
            .bind(product.critical_quantity)
            .bind(product.unit_value.to_string())
            .bind(product.stock_value.to_string())
            .bind(&product.photo)
            .bind(product.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for category_id in category_ids {
            sqlx::query("INSERT INTO product_categories (product_id, category_id) VALUES (?, ?)")
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
            "UPDATE products SET name = ?, description = ?, quantity = ?, critical_quantity = ?, unit_value = ?, stock_value = ?, photo = ? \
             WHERE company_id = ? AND id = ?",
        )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.quantity)
            .bind(product.critical_quantity)
            .bind(product.unit_value.to_string())
            .bind(product.stock_value.to_string())
            .bind(&product.photo)
            .bind(&product.company_id)
            .bind(&product.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM product_categories WHERE product_id = ?")
            .bind(&product.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for category_id in category_ids {
            sqlx::query("INSERT INTO product_categories (product_id, category_id) VALUES (?, ?)")
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
        let row = sqlx::query("SELECT * FROM products WHERE company_id = ? AND id = ?")
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
             WHERE pc.product_id = ? ORDER BY c.name ASC",
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
            "SELECT * FROM products p WHERE p.company_id = ? \
             AND (? IS NULL OR EXISTS (SELECT 1 FROM product_categories pc WHERE pc.product_id = p.id AND pc.category_id = ?)) \
             ORDER BY p.name ASC LIMIT ? OFFSET ?",
        )
            .bind(company_id)
            .bind(category_id)
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
            "SELECT COUNT(*) FROM products p WHERE p.company_id = ? \
             AND (? IS NULL OR EXISTS (SELECT 1 FROM product_categories pc WHERE pc.product_id = p.id AND pc.category_id = ?))",
        )
            .bind(company_id)
            .bind(category_id)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM products WHERE company_id = ? AND id = ?")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite product deletion failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }
}
