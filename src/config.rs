use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub jwt_secret: String,
    pub auth_issuer: String,
    pub token_ttl_secs: i64,
    pub frontend_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.inventory-system.local".to_string()),
            token_ttl_secs: env::var("TOKEN_TTL_SECS").unwrap_or_else(|_| "86400".to_string()).parse().expect("TOKEN_TTL_SECS must be a number"),
            frontend_base_url: env::var("FRONTEND_BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}
