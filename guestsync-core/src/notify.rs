//! Outbound notifications.
//!
//! A notification is a JSON body `{"text": message}` posted to an incoming
//! webhook (Slack-compatible). The reconciler only sends through
//! [`notify_best_effort`], which logs and swallows delivery failures.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::{GuestSyncError, GuestSyncResult};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> GuestSyncResult<()>;
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

/// Posts notifications to an incoming webhook URL.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> GuestSyncResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GuestSyncError::Notify(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Build from the configured `webhook_url`, failing if it is missing.
    pub fn from_config(config: &SyncConfig) -> GuestSyncResult<Self> {
        Self::new(config.webhook_url()?)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> GuestSyncResult<()> {
        debug!("Posting notification to webhook");

        let response = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { text: message })
            .send()
            .await
            .map_err(|e| GuestSyncError::Notify(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GuestSyncError::Notify(format!("{status}: {body}")));
        }

        Ok(())
    }
}

/// Send a notification, logging instead of returning any failure.
pub async fn notify_best_effort<N: Notifier + ?Sized>(notifier: &N, message: &str) {
    if let Err(e) = notifier.notify(message).await {
        warn!("Failed to send notification: {}", e);
    }
}
