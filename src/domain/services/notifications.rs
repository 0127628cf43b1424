use crate::domain::models::{product::Product, user::User};
use crate::domain::ports::Mailer;
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{error, warn};

/// Renders and dispatches notification mails. Sending is fire-and-forget:
/// the mail task is spawned, failures are logged, nothing is retried.
#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    templates: Arc<Tera>,
    frontend_base_url: String,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn Mailer>, templates: Arc<Tera>, frontend_base_url: String) -> Self {
        Self { mailer, templates, frontend_base_url }
    }

    pub fn notify_low_stock(&self, product: &Product, recipients: Vec<String>) {
        if recipients.is_empty() {
            warn!("Product {} is below critical quantity but the company has no admin recipients", product.id);
            return;
        }

        let mut ctx = Context::new();
        ctx.insert("product_name", &product.name);
        ctx.insert("quantity", &product.quantity);
        ctx.insert("critical_quantity", &product.critical_quantity);
        ctx.insert("description", &product.description);
        ctx.insert("photo_base64", &general_purpose::STANDARD.encode(&product.photo));
        ctx.insert("stock_url", &self.frontend_base_url);

        match self.templates.render("low_stock.html", &ctx) {
            Ok(html) => self.dispatch(recipients, "Product at critical quantity".to_string(), html),
            Err(e) => error!("Failed to render low-stock template: {:?}", e),
        }
    }

    pub fn send_password_reset(&self, user: &User, raw_token: &str) {
        let reset_link = format!("{}/reset-password?token={}", self.frontend_base_url, raw_token);

        let mut ctx = Context::new();
        ctx.insert("user_name", &user.name);
        ctx.insert("reset_link", &reset_link);

        match self.templates.render("password_reset.html", &ctx) {
            Ok(html) => self.dispatch(vec![user.email.clone()], "Password reset".to_string(), html),
            Err(e) => error!("Failed to render password-reset template: {:?}", e),
        }
    }

    fn dispatch(&self, recipients: Vec<String>, subject: String, html_body: String) {
        let mailer = self.mailer.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&recipients, &subject, &html_body).await {
                error!("Failed to send \"{}\" mail: {:?}", subject, e);
            }
        });
    }
}
