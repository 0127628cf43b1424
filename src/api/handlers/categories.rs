use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::CreateCategoryRequest;
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::category::Category;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_repo.list_by_company(&auth.user.company_id).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("The name field is required.".into()));
    }
    if name.len() > 80 {
        return Err(AppError::Validation("The name field must be at most 80 characters.".into()));
    }

    let category = Category::new(admin.user.company_id.clone(), name);
    let created = state.category_repo.create(&category).await?;

    info!("Category {} created", created.id);

    let location = format!("/api/v1/categories/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.category_repo.find_by_id(&admin.user.company_id, &id).await?
        .ok_or(AppError::NotFound("Category not found.".into()))?;

    state.category_repo.delete(&admin.user.company_id, &id).await?;

    info!("Category {} deleted by user {}", id, admin.user.id);
    Ok(StatusCode::NO_CONTENT)
}
