mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::Value;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes)),
    }
}

async fn token_request(app: &TestApp, body: String) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_password_grant_issues_bearer_token() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;

    let response = token_request(&app, "grant_type=password&username=alice@acme.test&password=admin123!".to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_and_unknown_users() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;

    let wrong_password = token_request(&app, "grant_type=password&username=alice@acme.test&password=wrong123!".to_string()).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown = token_request(&app, "grant_type=password&username=nobody@acme.test&password=admin123!".to_string()).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_unsupported_grant_type() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;

    let response = token_request(&app, "grant_type=client_credentials&username=alice@acme.test&password=admin123!".to_string()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_deactivated_users_cannot_log_in_and_tokens_stop_working() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;
    let operator = app.seed_user(&company.id, "Oscar Op", "oscar@acme.test", "operator1!", "ROLE_OPERATOR").await;

    let admin_token = app.login("alice@acme.test", "admin123!").await;
    let operator_token = app.login("oscar@acme.test", "operator1!").await;

    // Admin deactivates the operator.
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/users/{}/deactivate", operator.id))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Fresh login is refused.
    let login = token_request(&app, "grant_type=password&username=oscar@acme.test&password=operator1!".to_string()).await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);

    // The previously issued token no longer resolves to a principal.
    let me = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/users/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", operator_token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_bearer_token() {
    let app = TestApp::new().await;

    let no_token = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/users/me")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let garbage = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/users/me")
            .header(header::AUTHORIZATION, "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_operator_is_forbidden_on_admin_routes() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Oscar Op", "oscar@acme.test", "operator1!", "ROLE_OPERATOR").await;
    let token = app.login("oscar@acme.test", "operator1!").await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/company")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = parse_body(response).await;
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}
