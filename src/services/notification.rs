//! Winner notification port
//!
//! The winner record is the source of truth; notification is at-most-once
//! effort. Callers log failures and never roll back or re-queue on them.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::env;
use std::time::Duration;
use tracing::info;

/// Environment variable for the webhook notifier endpoint
const ENV_WINNER_WEBHOOK_URL: &str = "WINNER_WEBHOOK_URL";

/// Webhook request timeout (secs)
const WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct WinnerNotification {
    pub auction_id: i32,
    pub auction_code: String,
    pub title: String,
    pub winner_user_id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug)]
pub enum NotifyError {
    Http(String),
    InvalidConfig(String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Http(msg) => write!(f, "HTTP error: {}", msg),
            NotifyError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for NotifyError {}

#[async_trait]
pub trait WinnerNotifier: Send + Sync {
    async fn notify(&self, winner: &WinnerNotification) -> Result<(), NotifyError>;
}

/// Default notifier: logs the payload. Keeps the engine fully functional
/// when no delivery channel is configured.
pub struct LogNotifier;

#[async_trait]
impl WinnerNotifier for LogNotifier {
    async fn notify(&self, winner: &WinnerNotification) -> Result<(), NotifyError> {
        info!(
            auction_code = %winner.auction_code,
            winner_user_id = winner.winner_user_id,
            amount = %winner.amount,
            "Winner announced"
        );
        Ok(())
    }
}

/// POSTs the winner payload as JSON to a configured endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, NotifyError> {
        if url.trim().is_empty() {
            return Err(NotifyError::InvalidConfig("empty webhook URL".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::InvalidConfig(format!("client build failed: {}", e)))?;
        Ok(Self { client, url })
    }

    /// Construct from WINNER_WEBHOOK_URL when set.
    pub fn from_env() -> Option<Self> {
        let url = env::var(ENV_WINNER_WEBHOOK_URL).ok()?;
        match Self::new(url) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid winner webhook configuration");
                None
            }
        }
    }
}

#[async_trait]
impl WinnerNotifier for WebhookNotifier {
    async fn notify(&self, winner: &WinnerNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(winner)
            .send()
            .await
            .map_err(|e| NotifyError::Http(format!("request failed: {}", e)))?;

        response
            .error_for_status()
            .map_err(|e| NotifyError::Http(format!("webhook returned error: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload() -> WinnerNotification {
        WinnerNotification {
            auction_id: 1,
            auction_code: "AUC-TEST".into(),
            title: "Lot".into(),
            winner_user_id: 7,
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            amount: dec!(750),
        }
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        assert!(LogNotifier.notify(&payload()).await.is_ok());
    }

    #[test]
    fn test_webhook_rejects_empty_url() {
        assert!(WebhookNotifier::new(String::new()).is_err());
    }
}
