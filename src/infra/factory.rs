use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::notifications::NotificationService;
use crate::domain::services::password_reset::PasswordResetService;
use crate::infra::email::http_mailer::HttpMailer;
use crate::infra::repositories::{
    postgres_category_repo::PostgresCategoryRepo, postgres_company_repo::PostgresCompanyRepo,
    postgres_password_reset_repo::PostgresPasswordResetRepo, postgres_product_repo::PostgresProductRepo,
    postgres_role_repo::PostgresRoleRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_category_repo::SqliteCategoryRepo, sqlite_company_repo::SqliteCompanyRepo,
    sqlite_password_reset_repo::SqlitePasswordResetRepo, sqlite_product_repo::SqliteProductRepo,
    sqlite_role_repo::SqliteRoleRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("low_stock.html", include_str!("../templates/low_stock.html"))
        .expect("Failed to load low-stock template");
    tera.add_raw_template("password_reset.html", include_str!("../templates/password_reset.html"))
        .expect("Failed to load password-reset template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let mailer = Arc::new(HttpMailer::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let templates = Arc::new(load_templates());
    let notifications = NotificationService::new(mailer, templates, config.frontend_base_url.clone());
    let auth_service = Arc::new(AuthService::new(config.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
        let reset_repo = Arc::new(PostgresPasswordResetRepo::new(pool.clone()));
        let reset_service = Arc::new(PasswordResetService::new(user_repo.clone(), reset_repo));

        AppState {
            config: config.clone(),
            company_repo: Arc::new(PostgresCompanyRepo::new(pool.clone())),
            user_repo,
            role_repo: Arc::new(PostgresRoleRepo::new(pool.clone())),
            category_repo: Arc::new(PostgresCategoryRepo::new(pool.clone())),
            product_repo: Arc::new(PostgresProductRepo::new(pool.clone())),
            auth_service,
            reset_service,
            notifications,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let reset_repo = Arc::new(SqlitePasswordResetRepo::new(pool.clone()));
        let reset_service = Arc::new(PasswordResetService::new(user_repo.clone(), reset_repo));

        AppState {
            config: config.clone(),
            company_repo: Arc::new(SqliteCompanyRepo::new(pool.clone())),
            user_repo,
            role_repo: Arc::new(SqliteRoleRepo::new(pool.clone())),
            category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            product_repo: Arc::new(SqliteProductRepo::new(pool.clone())),
            auth_service,
            reset_service,
            notifications,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
