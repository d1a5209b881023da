use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Envoi d'email derrière un trait: les transitions d'état du compte ne
/// dépendent jamais du fournisseur de mail
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), String>;
}

#[derive(Serialize)]
struct ResendEmailBody<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

/// Mailer de production via l'API HTTP de Resend
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key, from }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), String> {
        let body = ResendEmailBody {
            from: &self.from,
            to: vec![to],
            subject,
            html,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Resend request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Resend returned {}: {}", status, text));
        }

        info!("email sent to {}", to);
        Ok(())
    }
}

/// Mailer de repli quand RESEND_API_KEY n'est pas configurée (dev, tests)
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), String> {
        info!("email sending disabled, would have sent \"{}\" to {}", subject, to);
        Ok(())
    }
}

pub fn from_env() -> Arc<dyn Mailer> {
    match std::env::var("RESEND_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            let from = std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@example.com".to_string());
            Arc::new(ResendMailer::new(api_key, from))
        }
        _ => {
            eprintln!("⚠️  WARNING: RESEND_API_KEY not set, emails will only be logged");
            Arc::new(NoopMailer)
        }
    }
}

/// Envoi fire-and-forget: la mutation du compte est déjà commitée, un échec
/// ou un timeout d'envoi est loggé et jamais remonté à l'appelant
pub fn send_in_background(mailer: Arc<dyn Mailer>, to: String, subject: String, html: String) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&to, &subject, &html).await {
            error!("email dispatch failed: {}", e);
        }
    });
}
