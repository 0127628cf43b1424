use crate::config::Config;
use crate::domain::ports::{
    CategoryRepository, CompanyRepository, ProductRepository, RoleRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::notifications::NotificationService;
use crate::domain::services::password_reset::PasswordResetService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub role_repo: Arc<dyn RoleRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub auth_service: Arc<AuthService>,
    pub reset_service: Arc<PasswordResetService>,
    pub notifications: NotificationService,
}
