use serde::Deserialize;

#[derive(Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub authority: String,
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CompanyUsersQuery {
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub category_id: Option<String>,
}
