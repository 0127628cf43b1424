use crate::domain::models::{category::Category, company::Company, product::Product, user::{Role, User}};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

fn encode_photo(photo: &[u8]) -> String {
    general_purpose::STANDARD.encode(photo)
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub first_access: bool,
    pub roles: Vec<String>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            company_id: user.company_id,
            name: user.name,
            email: user.email,
            active: user.active,
            first_access: user.first_access,
            roles: roles.into_iter().map(|r| r.authority).collect(),
            photo: user.photo.as_deref().map(encode_photo),
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserPhotoResponse {
    pub photo: Option<String>,
}

impl UserPhotoResponse {
    pub fn from_user(user: &User) -> Self {
        Self { photo: user.photo.as_deref().map(encode_photo) }
    }
}

#[derive(Serialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub cnpj: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            cnpj: company.cnpj,
            photo: company.photo.as_deref().map(encode_photo),
            created_at: company.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub critical_quantity: i64,
    pub unit_value: Decimal,
    pub stock_value: Decimal,
    pub photo: String,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn from_product(product: Product, categories: Vec<Category>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            quantity: product.quantity,
            critical_quantity: product.critical_quantity,
            unit_value: product.unit_value,
            stock_value: product.stock_value,
            photo: encode_photo(&product.photo),
            categories,
            created_at: product.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    pub fn new(content: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if size > 0 { (total_elements + size - 1) / size } else { 0 };
        Self { content, page, size, total_elements, total_pages }
    }
}
