use crate::domain::models::{
    category::Category, company::Company, password_reset::PasswordResetToken, product::Product,
    user::{Role, User},
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: &Company) -> Result<Company, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError>;
    async fn update(&self, company: &Company) -> Result<Company, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and its role assignments in one transaction.
    async fn create(&self, user: &User, role_ids: &[String]) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_by_company(&self, company_id: &str, active: bool) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn roles_of(&self, user_id: &str) -> Result<Vec<Role>, AppError>;
    async fn replace_roles(&self, user_id: &str, role_id: &str) -> Result<(), AppError>;
    async fn list_admin_emails(&self, company_id: &str) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_authority(&self, authority: &str) -> Result<Option<Role>, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
    async fn find_by_id(&self, company_id: &str, id: &str) -> Result<Option<Category>, AppError>;
    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Category>, AppError>;
    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts the product and its category links in one transaction.
    async fn create(&self, product: &Product, category_ids: &[String]) -> Result<Product, AppError>;
    /// Updates the product and replaces its category links in one transaction.
    async fn update(&self, product: &Product, category_ids: &[String]) -> Result<Product, AppError>;
    async fn find_by_id(&self, company_id: &str, id: &str) -> Result<Option<Product>, AppError>;
    async fn categories_of(&self, product_id: &str) -> Result<Vec<Category>, AppError>;
    async fn list_paged(
        &self,
        company_id: &str,
        category_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError>;
    async fn count(&self, company_id: &str, category_id: Option<&str>) -> Result<i64, AppError>;
    async fn delete(&self, company_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), AppError>;
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn delete_by_user(&self, user_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<(), AppError>;
}
