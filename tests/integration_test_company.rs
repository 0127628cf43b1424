mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{multipart_body, multipart_content_type, TestApp};
use serde_json::Value;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes))
    })
}

#[tokio::test]
async fn test_admin_reads_own_company() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;
    let token = app.login("alice@acme.test", "admin123!").await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/company")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response).await;
    assert_eq!(body["id"], company.id);
    assert_eq!(body["name"], "Acme Ltd");
    assert_eq!(body["cnpj"], "12.345.678/0001-90");
}

#[tokio::test]
async fn test_company_update_accepts_png_and_rejects_other_types() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;
    let token = app.login("alice@acme.test", "admin123!").await;

    let png = multipart_body(
        &[("name", "Acme Industries")],
        &[("photo", "logo.png", "image/png", &[137u8, 80, 78, 71])],
    );
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri("/api/v1/company")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(png))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response).await;
    assert_eq!(body["name"], "Acme Industries");
    assert!(body["photo"].as_str().is_some());

    let gif = multipart_body(
        &[("name", "Acme Industries")],
        &[("photo", "logo.gif", "image/gif", &[71u8, 73, 70])],
    );
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri("/api/v1/company")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(gif))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = parse_body(response).await;
    assert_eq!(body["error"], "Invalid file type. Only JPEG and PNG are allowed.");
}

#[tokio::test]
async fn test_company_user_listing_filters_by_active_flag() {
    let app = TestApp::new().await;
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;
    let operator = app.seed_user(&company.id, "Oscar Op", "oscar@acme.test", "operator1!", "ROLE_OPERATOR").await;
    let token = app.login("alice@acme.test", "admin123!").await;

    // Deactivate the operator so the two listings diverge.
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/users/{}/deactivate", operator.id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let active = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/company/users")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    let active_users = parse_body(active).await;
    let active_arr = active_users.as_array().unwrap();
    assert_eq!(active_arr.len(), 1);
    assert_eq!(active_arr[0]["email"], "alice@acme.test");

    let inactive = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/company/users?active=false")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    let inactive_users = parse_body(inactive).await;
    let inactive_arr = inactive_users.as_array().unwrap();
    assert_eq!(inactive_arr.len(), 1);
    assert_eq!(inactive_arr[0]["email"], "oscar@acme.test");
}

#[tokio::test]
async fn test_company_listing_does_not_leak_other_tenants() {
    let app = TestApp::new().await;
    let acme = app.seed_company("Acme Ltd").await;
    let globex = app.seed_company("Globex Corp").await;
    app.seed_user(&acme.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;
    app.seed_user(&globex.id, "Gary Admin", "gary@globex.test", "admin123!", "ROLE_ADMIN").await;
    let token = app.login("alice@acme.test", "admin123!").await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/company/users")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    let users = parse_body(response).await;
    let arr = users.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["email"], "alice@acme.test");
}
