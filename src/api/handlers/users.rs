use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{UpdatePasswordRequest, UpdateRoleRequest};
use crate::api::dtos::responses::{UserPhotoResponse, UserResponse};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::user::User;
use crate::domain::services::auth_service::{hash_password, validate_password_policy};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

fn validate_field(value: &str, field_name: &str, min_len: usize, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("The {} field is required.", field_name)));
    }
    if value.len() < min_len || value.len() > max_len {
        return Err(AppError::Validation(format!(
            "The {} field must be between {} and {} characters.",
            field_name, min_len, max_len
        )));
    }
    Ok(())
}

#[derive(Default)]
struct NewUserForm {
    name: String,
    email: String,
    password: String,
    photo: Option<Vec<u8>>,
    roles: Vec<String>,
}

async fn parse_new_user_form(mut multipart: Multipart) -> Result<NewUserForm, AppError> {
    let mut form = NewUserForm::default();

    while let Some(field) = multipart.next_field().await
        .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => form.name = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            "password" => form.password = read_text(field).await?,
            "roles" => form.roles.push(read_text(field).await?),
            "photo" => form.photo = Some(read_bytes(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field.text().await
        .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))
}

async fn read_bytes(field: axum::extract::multipart::Field<'_>) -> Result<Vec<u8>, AppError> {
    Ok(field.bytes().await
        .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?
        .to_vec())
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.user_repo.roles_of(&auth.user.id).await?;
    Ok(Json(UserResponse::from_user(auth.user, roles)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = parse_new_user_form(multipart).await?;

    validate_field(&form.name, "name", 4, 60)?;
    validate_field(&form.email, "e-mail", 1, 255)?;
    validate_password_policy(&form.password)?;

    if state.user_repo.find_by_email(&form.email).await?.is_some() {
        return Err(AppError::Validation("Email already registered.".into()));
    }

    let photo = form.photo
        .filter(|p| !p.is_empty())
        .ok_or(AppError::Validation("The photo field is required.".into()))?;

    if form.roles.is_empty() {
        return Err(AppError::Validation("The user must have at least one role.".into()));
    }
    let mut role_ids = Vec::with_capacity(form.roles.len());
    for authority in &form.roles {
        let role = state.role_repo.find_by_authority(authority).await?
            .ok_or(AppError::NotFound("Role not found.".into()))?;
        role_ids.push(role.id);
    }

    let password_hash = hash_password(&form.password)?;
    let mut user = User::new(admin.user.company_id.clone(), form.name, form.email, password_hash);
    user.photo = Some(photo);

    let created = state.user_repo.create(&user, &role_ids).await?;
    let roles = state.user_repo.roles_of(&created.id).await?;

    info!("User {} created", created.id);

    let location = format!("/api/v1/users/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from_user(created, roles)),
    ))
}

async fn set_active(
    state: &AppState,
    admin: &AuthUser,
    id: &str,
    active: bool,
) -> Result<StatusCode, AppError> {
    let mut user = state.user_repo.find_by_id(id).await?
        .filter(|u| u.company_id == admin.user.company_id)
        .ok_or(AppError::NotFound("User not found.".into()))?;

    user.active = active;
    state.user_repo.update(&user).await?;

    info!("User {} {}", id, if active { "activated" } else { "deactivated" });
    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_active(&state, &admin, &id, true).await
}

pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_active(&state, &admin, &id, false).await
}

pub async fn update_password(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_password_policy(&payload.password)?;

    let mut user = auth.user;
    user.password_hash = hash_password(&payload.password)?;
    if user.first_access {
        user.first_access = false;
    }
    state.user_repo.update(&user).await?;

    info!("Password updated for user {}", user.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.role_repo.find_by_authority(&payload.authority).await?
        .ok_or(AppError::NotFound("Role not found.".into()))?;

    let user = state.user_repo.find_by_id(&id).await?
        .filter(|u| u.company_id == admin.user.company_id)
        .ok_or(AppError::NotFound("User not found.".into()))?;

    state.user_repo.replace_roles(&user.id, &role.id).await?;

    info!("User {} switched to role {}", user.id, payload.authority);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut password: Option<String> = None;
    let mut photo: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await
        .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "password" => password = Some(read_text(field).await?),
            "photo" => photo = Some(read_bytes(field).await?),
            _ => {}
        }
    }

    let mut user = auth.user;

    if let Some(password) = password.filter(|p| !p.is_empty()) {
        validate_password_policy(&password)?;
        user.password_hash = hash_password(&password)?;
    }
    if let Some(photo) = photo.filter(|p| !p.is_empty()) {
        user.photo = Some(photo);
    }

    state.user_repo.update(&user).await?;

    info!("Profile updated for user {}", user.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_user_photo(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&email).await?
        .filter(|u| u.company_id == auth.user.company_id)
        .ok_or(AppError::NotFound("User not found.".into()))?;

    Ok(Json(UserPhotoResponse::from_user(&user)))
}
