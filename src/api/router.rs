use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{auth, categories, company, health, password_reset, products, users};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/token", post(auth::issue_token))

        // Password reset (unauthenticated)
        .route("/api/v1/password-reset/request", post(password_reset::request_reset))
        .route("/api/v1/password-reset/confirm", post(password_reset::confirm_reset))

        // Users
        .route("/api/v1/users", post(users::create_user))
        .route("/api/v1/users/me", get(users::me).put(users::update_me))
        .route("/api/v1/users/password", put(users::update_password))
        .route("/api/v1/users/photo/{email}", get(users::get_user_photo))
        .route("/api/v1/users/{id}/activate", put(users::activate_user))
        .route("/api/v1/users/{id}/deactivate", put(users::deactivate_user))
        .route("/api/v1/users/{id}/role", put(users::update_role))

        // Company
        .route("/api/v1/company", get(company::get_company).put(company::update_company))
        .route("/api/v1/company/users", get(company::list_company_users))

        // Categories
        .route("/api/v1/categories", get(categories::list_categories).post(categories::create_category))
        .route("/api/v1/categories/{id}", delete(categories::delete_category))

        // Products
        .route("/api/v1/products", get(products::list_products).post(products::create_product))
        .route("/api/v1/products/{id}", get(products::get_product).put(products::update_product).delete(products::delete_product))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        company_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
