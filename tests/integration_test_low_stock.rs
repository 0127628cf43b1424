mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{multipart_body, multipart_content_type, TestApp};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("Failed to parse JSON body")
}

fn product_form(name: &str, quantity: &str, critical_quantity: &str, category_id: &str) -> Vec<u8> {
    multipart_body(&[
        ("name", name),
        ("description", "Workshop supply"),
        ("quantity", quantity),
        ("critical_quantity", critical_quantity),
        ("unit_value", "5.00"),
        ("categories", category_id),
    ], &[("photo", "product.png", "image/png", &[1u8, 2, 3])])
}

async fn setup(app: &TestApp) -> (String, String) {
    let company = app.seed_company("Acme Ltd").await;
    app.seed_user(&company.id, "Alice Admin", "alice@acme.test", "admin123!", "ROLE_ADMIN").await;
    app.seed_user(&company.id, "Bert Admin", "bert@acme.test", "admin123!", "ROLE_ADMIN").await;
    app.seed_user(&company.id, "Oscar Op", "oscar@acme.test", "operator1!", "ROLE_OPERATOR").await;
    let token = app.login("alice@acme.test", "admin123!").await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/categories")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "Tools"}).to_string()))
            .unwrap()
    ).await.unwrap();
    let category = parse_body(response).await;

    (token, category["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn test_low_stock_creation_alerts_company_admins_only() {
    let app = TestApp::new().await;
    let (token, category_id) = setup(&app).await;

    // Quantity equal to the critical threshold fires the alert.
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(product_form("Claw Hammer", "3", "3", &category_id)))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let sent = app.wait_for_mail(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Product at critical quantity");
    assert!(sent[0].html_body.contains("Claw Hammer"));

    let mut recipients = sent[0].recipients.clone();
    recipients.sort();
    assert_eq!(recipients, vec!["alice@acme.test", "bert@acme.test"]);
}

#[tokio::test]
async fn test_healthy_stock_sends_no_mail() {
    let app = TestApp::new().await;
    let (token, category_id) = setup(&app).await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(product_form("Claw Hammer", "10", "3", &category_id)))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Give the (unexpected) mail task a moment to run before asserting.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_update_dropping_quantity_below_critical_alerts() {
    let app = TestApp::new().await;
    let (token, category_id) = setup(&app).await;

    let created = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/products")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(product_form("Claw Hammer", "10", "3", &category_id)))
            .unwrap()
    ).await.unwrap();
    let product = parse_body(created).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/products/{}", product_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(product_form("Claw Hammer", "2", "3", &category_id)))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.wait_for_mail(1).await;
    assert_eq!(sent[0].subject, "Product at critical quantity");
    assert!(sent[0].html_body.contains("2/3"));
}
