use axum::{
    extract::{Multipart, Query, State},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::CompanyUsersQuery;
use crate::api::dtos::responses::{CompanyResponse, UserResponse};
use crate::api::extractors::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

const ALLOWED_PHOTO_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub async fn get_company(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let company = state.company_repo.find_by_id(&admin.user.company_id).await?
        .ok_or(AppError::NotFound("Company not found.".into()))?;

    Ok(Json(CompanyResponse::from(company)))
}

pub async fn update_company(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut name: Option<String> = None;
    let mut photo: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await
        .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = Some(field.text().await
                    .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?);
            }
            "photo" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
                    return Err(AppError::Validation(
                        "Invalid file type. Only JPEG and PNG are allowed.".into(),
                    ));
                }
                photo = Some(field.bytes().await
                    .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?
                    .to_vec());
            }
            _ => {}
        }
    }

    let name = name.filter(|n| !n.trim().is_empty())
        .ok_or(AppError::Validation("The name field is required.".into()))?;
    let photo = photo.filter(|p| !p.is_empty())
        .ok_or(AppError::Validation("The photo field is required.".into()))?;

    let mut company = state.company_repo.find_by_id(&admin.user.company_id).await?
        .ok_or(AppError::NotFound("Company not found.".into()))?;

    company.name = name;
    company.photo = Some(photo);
    let updated = state.company_repo.update(&company).await?;

    info!("Company {} updated", updated.id);
    Ok(Json(CompanyResponse::from(updated)))
}

pub async fn list_company_users(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Query(query): Query<CompanyUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let active = query.active.unwrap_or(true);
    let users = state.user_repo.list_by_company(&admin.user.company_id, active).await?;

    let mut entries = Vec::with_capacity(users.len());
    for user in users {
        let roles = state.user_repo.roles_of(&user.id).await?;
        entries.push(UserResponse::from_user(user, roles));
    }

    Ok(Json(entries))
}
