//! Telegram delivery configuration.

use std::time::Duration;

/// Destination and credentials for Telegram delivery.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token.
    pub bot_token: String,
    /// Chat to deliver messages to.
    pub chat_id: String,
    /// Bot API base URL.
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl TelegramConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.telegram.org";

    /// Create a config for the public Bot API.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            ..Default::default()
        }
    }

    /// Whether both token and chat id are set.
    pub fn has_credentials(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }

    /// `sendMessage` endpoint for this bot.
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}
