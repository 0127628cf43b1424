use crate::domain::ports::Mailer;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Delivers mail through the HTTP relay service configured via
/// `MAIL_SERVICE_URL` / `MAIL_SERVICE_TOKEN`.
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct MailPayload {
    from_alias: String,
    to_addrs: Vec<String>,
    subject: String,
    html_body: String,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<(), AppError> {
        let payload = MailPayload {
            from_alias: "default".to_string(),
            to_addrs: recipients.to_vec(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Mail service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Mail service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
