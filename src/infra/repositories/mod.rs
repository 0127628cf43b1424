pub mod sqlite_company_repo;
pub mod sqlite_user_repo;
pub mod sqlite_role_repo;
pub mod sqlite_category_repo;
pub mod sqlite_product_repo;
pub mod sqlite_password_reset_repo;
pub mod postgres_company_repo;
pub mod postgres_user_repo;
pub mod postgres_role_repo;
pub mod postgres_category_repo;
pub mod postgres_product_repo;
pub mod postgres_password_reset_repo;
