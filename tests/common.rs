use inventory_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{company::Company, user::User},
    domain::ports::Mailer,
    domain::services::auth_service::{hash_password, AuthService},
    domain::services::notifications::NotificationService,
    domain::services::password_reset::PasswordResetService,
    error::AppError,
    infra::repositories::{
        sqlite_category_repo::SqliteCategoryRepo,
        sqlite_company_repo::SqliteCompanyRepo,
        sqlite_password_reset_repo::SqlitePasswordResetRepo,
        sqlite_product_repo::SqliteProductRepo,
        sqlite_role_repo::SqliteRoleRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct SentMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl MockMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentMail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mailer: MockMailer,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "low_stock.html",
            "<html>Low stock: {{ product_name }} at {{ quantity }}/{{ critical_quantity }}</html>",
        ).unwrap();
        tera.add_raw_template(
            "password_reset.html",
            "<html>Hello {{ user_name }}, reset here: {{ reset_link }}</html>",
        ).unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret: "test-secret-key".to_string(),
            auth_issuer: "test-issuer".to_string(),
            token_ttl_secs: 3600,
            frontend_base_url: "http://frontend.local".to_string(),
        };

        let mailer = MockMailer::default();
        let notifications = NotificationService::new(
            Arc::new(mailer.clone()),
            templates,
            config.frontend_base_url.clone(),
        );

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let reset_repo = Arc::new(SqlitePasswordResetRepo::new(pool.clone()));
        let reset_service = Arc::new(PasswordResetService::new(user_repo.clone(), reset_repo));
        let auth_service = Arc::new(AuthService::new(config.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            company_repo: Arc::new(SqliteCompanyRepo::new(pool.clone())),
            user_repo,
            role_repo: Arc::new(SqliteRoleRepo::new(pool.clone())),
            category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            product_repo: Arc::new(SqliteProductRepo::new(pool.clone())),
            auth_service,
            reset_service,
            notifications,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mailer,
        }
    }

    pub async fn seed_company(&self, name: &str) -> Company {
        let company = Company::new(name.to_string(), "12.345.678/0001-90".to_string());
        self.state.company_repo.create(&company).await.expect("Failed to seed company")
    }

    pub async fn seed_user(
        &self,
        company_id: &str,
        name: &str,
        email: &str,
        password: &str,
        authority: &str,
    ) -> User {
        let role = self.state.role_repo.find_by_authority(authority).await
            .expect("Failed to load role")
            .expect("Role not seeded");

        let password_hash = hash_password(password).expect("Failed to hash password");
        let mut user = User::new(
            company_id.to_string(),
            name.to_string(),
            email.to_string(),
            password_hash,
        );
        user.photo = Some(vec![1u8, 2, 3]);

        self.state.user_repo.create(&user, &[role.id]).await.expect("Failed to seed user")
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = format!("grant_type=password&username={}&password={}", email, password);

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        body_json["access_token"].as_str().expect("No access_token in body").to_string()
    }

    /// Mail dispatch is fire-and-forget, so tests poll for delivery.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<SentMail> {
        for _ in 0..100 {
            let sent = self.mailer.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "Timed out waiting for {} mail(s); got {:?}",
            count,
            self.mailer.sent()
        );
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

#[allow(dead_code)]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Builds a raw multipart/form-data body from plain fields and file parts
/// (name, filename, content type, bytes).
#[allow(dead_code)]
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ).as_bytes(),
        );
    }

    for (name, filename, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            ).as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
