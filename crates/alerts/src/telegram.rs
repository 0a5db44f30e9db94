//! Telegram Bot API delivery.

use crate::config::TelegramConfig;
use crate::notifier::NotificationSink;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram credentials missing")]
    MissingCredentials,
    #[error("Telegram request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Telegram rejected message: {0}")]
    Rejected(String),
}

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Check the `ok` flag of a Bot API response.
pub fn check_response(body: &str) -> Result<(), TelegramError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| TelegramError::Rejected(format!("unparseable response: {}", e)))?;

    if json["ok"].as_bool().unwrap_or(false) {
        return Ok(());
    }

    let description = json["description"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    Err(TelegramError::Rejected(description))
}

/// Sends HTML-formatted messages to one chat.
pub struct TelegramNotifier {
    config: TelegramConfig,
    http: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a new notifier.
    pub fn new(config: TelegramConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build Telegram client, using defaults");
                reqwest::Client::new()
            });

        Self { config, http }
    }

    /// Deliver a message, reporting why it failed.
    pub async fn deliver(&self, text: &str) -> Result<(), TelegramError> {
        if !self.config.has_credentials() {
            return Err(TelegramError::MissingCredentials);
        }

        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self
            .http
            .post(self.config.send_message_url())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, "Telegram responded");

        check_response(&text)
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send(&self, text: &str) -> bool {
        match self.deliver(text).await {
            Ok(()) => true,
            Err(TelegramError::MissingCredentials) => {
                warn!("Telegram credentials missing, message not sent");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to send Telegram message");
                false
            }
        }
    }
}
