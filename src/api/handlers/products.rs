use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::ProductListQuery;
use crate::api::dtos::responses::{PageResponse, ProductResponse};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::{category::Category, product::Product};
use crate::error::AppError;
use crate::state::AppState;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Default)]
struct ProductForm {
    name: String,
    description: String,
    quantity: Option<i64>,
    critical_quantity: Option<i64>,
    unit_value: Option<Decimal>,
    photo: Option<Vec<u8>>,
    categories: Vec<String>,
}

/// Product fields after validation, ready to be persisted.
struct ProductInput {
    name: String,
    description: String,
    quantity: i64,
    critical_quantity: i64,
    unit_value: Decimal,
    photo: Vec<u8>,
    categories: Vec<String>,
}

async fn parse_product_form(mut multipart: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await
        .map_err(|_| AppError::Validation("Malformed multipart payload.".into()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        let read_err = || AppError::Validation("Malformed multipart payload.".into());
        match field_name.as_str() {
            "name" => form.name = field.text().await.map_err(|_| read_err())?,
            "description" => form.description = field.text().await.map_err(|_| read_err())?,
            "quantity" => {
                let raw = field.text().await.map_err(|_| read_err())?;
                form.quantity = Some(raw.trim().parse().map_err(|_| {
                    AppError::Validation("The quantity field must be a whole number.".into())
                })?);
            }
            "critical_quantity" => {
                let raw = field.text().await.map_err(|_| read_err())?;
                form.critical_quantity = Some(raw.trim().parse().map_err(|_| {
                    AppError::Validation("The critical quantity field must be a whole number.".into())
                })?);
            }
            "unit_value" => {
                let raw = field.text().await.map_err(|_| read_err())?;
                form.unit_value = Some(Decimal::from_str(raw.trim()).map_err(|_| {
                    AppError::Validation("The unit value must be a decimal number.".into())
                })?);
            }
            "photo" => {
                form.photo = Some(field.bytes().await.map_err(|_| read_err())?.to_vec());
            }
            "categories" => form.categories.push(field.text().await.map_err(|_| read_err())?),
            _ => {}
        }
    }

    Ok(form)
}

fn validate(form: ProductForm) -> Result<ProductInput, AppError> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("The name field is required.".into()));
    }
    if form.name.len() < 4 || form.name.len() > 60 {
        return Err(AppError::Validation("The name field must be between 4 and 60 characters.".into()));
    }

    let quantity = form.quantity.unwrap_or(0);
    if quantity < 1 {
        return Err(AppError::Validation("The quantity field must be greater than or equal to one.".into()));
    }

    if form.description.len() < 4 || form.description.len() > 60 {
        return Err(AppError::Validation("The description field must be between 4 and 60 characters.".into()));
    }

    let photo = form.photo.filter(|p| !p.is_empty())
        .ok_or(AppError::Validation("The photo field is required.".into()))?;

    let critical_quantity = form.critical_quantity.unwrap_or(0);
    if critical_quantity < 1 {
        return Err(AppError::Validation("The critical quantity field must be greater than or equal to one.".into()));
    }

    let unit_value = form.unit_value.unwrap_or(Decimal::ZERO);
    if unit_value <= Decimal::ZERO {
        return Err(AppError::Validation("The unit value must be greater than zero.".into()));
    }

    if form.categories.is_empty() {
        return Err(AppError::Validation("The product must have at least one category.".into()));
    }

    Ok(ProductInput {
        name: form.name,
        description: form.description,
        quantity,
        critical_quantity,
        unit_value,
        photo,
        categories: form.categories,
    })
}

async fn resolve_categories(
    state: &AppState,
    company_id: &str,
    ids: &[String],
) -> Result<Vec<Category>, AppError> {
    let mut categories = Vec::with_capacity(ids.len());
    for id in ids {
        let category = state.category_repo.find_by_id(company_id, id).await?
            .ok_or(AppError::NotFound("Category not found.".into()))?;
        categories.push(category);
    }
    Ok(categories)
}

/// Fires the low-stock alert mail when the product sits at or below its
/// critical quantity. Fire-and-forget; failures are only logged.
async fn check_low_stock(state: &AppState, product: &Product) -> Result<(), AppError> {
    if product.is_below_critical() {
        let recipients = state.user_repo.list_admin_emails(&product.company_id).await?;
        state.notifications.notify_low_stock(product, recipients);
    }
    Ok(())
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(0).max(0);
    let size = query.size.unwrap_or(10).clamp(1, 100);
    let category_id = query.category_id.as_deref();
    let company_id = &auth.user.company_id;

    let total = state.product_repo.count(company_id, category_id).await?;
    let products = state.product_repo
        .list_paged(company_id, category_id, size, page * size)
        .await?;

    let mut content = Vec::with_capacity(products.len());
    for product in products {
        let categories = state.product_repo.categories_of(&product.id).await?;
        content.push(ProductResponse::from_product(product, categories));
    }

    info!(
        "Returning product page {} for company {}{}",
        page,
        company_id,
        category_id.map(|c| format!(" filtered by category {}", c)).unwrap_or_default()
    );

    Ok(Json(PageResponse::new(content, page, size, total)))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_id(&auth.user.company_id, &id).await?
        .ok_or(AppError::NotFound("Product not found.".into()))?;
    let categories = state.product_repo.categories_of(&product.id).await?;

    Ok(Json(ProductResponse::from_product(product, categories)))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let input = validate(parse_product_form(multipart).await?)?;
    let company_id = admin.user.company_id.clone();

    let categories = resolve_categories(&state, &company_id, &input.categories).await?;
    let category_ids: Vec<String> = categories.iter().map(|c| c.id.clone()).collect();

    let product = Product::new(
        company_id,
        input.name,
        input.description,
        input.quantity,
        input.critical_quantity,
        input.unit_value,
        input.photo,
    );

    let created = state.product_repo.create(&product, &category_ids).await?;
    check_low_stock(&state, &created).await?;

    info!("Product {} created", created.id);

    let location = format!("/api/v1/products/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from_product(created, categories)),
    ))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let input = validate(parse_product_form(multipart).await?)?;
    let company_id = admin.user.company_id.clone();

    let mut product = state.product_repo.find_by_id(&company_id, &id).await?
        .ok_or(AppError::NotFound("Product not found.".into()))?;

    let categories = resolve_categories(&state, &company_id, &input.categories).await?;
    let category_ids: Vec<String> = categories.iter().map(|c| c.id.clone()).collect();

    product.name = input.name;
    product.description = input.description;
    product.quantity = input.quantity;
    product.critical_quantity = input.critical_quantity;
    product.unit_value = input.unit_value;
    product.photo = input.photo;
    product.recalculate_stock_value();

    let updated = state.product_repo.update(&product, &category_ids).await?;
    check_low_stock(&state, &updated).await?;

    info!("Product {} updated", updated.id);
    Ok(Json(ProductResponse::from_product(updated, categories)))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.product_repo.find_by_id(&admin.user.company_id, &id).await?
        .ok_or(AppError::NotFound("Product not found.".into()))?;

    state.product_repo.delete(&admin.user.company_id, &id).await?;

    info!("Product {} deleted by user {}", id, admin.user.id);
    Ok(StatusCode::NO_CONTENT)
}
