use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::AppError;

/// Something worth telling the teacher about, pushed to an external
/// channel. Delivery is best-effort; the persisted notification row is
/// the source of truth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub kind: String,
    pub class_id: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), AppError>;
}

#[derive(Clone, Debug)]
pub struct NotifierConfig {
    pub webhook_url: String,
}

impl NotifierConfig {
    pub fn new_from_env() -> Option<Self> {
        env::var("NOTIFY_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(|webhook_url| Self { webhook_url })
    }
}

/// Posts each event as JSON to a configured webhook.
pub struct WebhookNotifier {
    client: Client,
    config: NotifierConfig,
}

impl WebhookNotifier {
    pub fn new(config: NotifierConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::BadRequest(format!("webhook send failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::BadRequest(format!(
                "webhook error {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}

/// Discards every event. Used in tests and when no webhook is
/// configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _event: &NotificationEvent) -> Result<(), AppError> {
        Ok(())
    }
}
