//! Explorer REST client.
//!
//! Lists the most recent transactions of one class for an address. Every
//! request goes through a [`RequestThrottle`] so consecutive calls respect
//! the explorer's rate limit.

use crate::error::ExplorerError;
use crate::response::{decode_native_page, decode_token_page};
use crate::throttle::{RequestThrottle, MIN_REQUEST_INTERVAL};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use wallet_watch_core::{NativeTransfer, TokenTransfer, TxClass, WalletAddress};

/// Source of transaction pages, most recent first.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// List native-currency transfers for an address.
    async fn native_transfers(
        &self,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<Vec<NativeTransfer>, ExplorerError>;

    /// List token transfers for an address.
    async fn token_transfers(
        &self,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<Vec<TokenTransfer>, ExplorerError>;
}

/// Explorer `action` parameter for a transaction class.
pub fn action_for(class: TxClass) -> &'static str {
    match class {
        TxClass::Native => "txlist",
        TxClass::Token => "tokentx",
    }
}

/// Configuration for the explorer client.
#[derive(Clone)]
pub struct ExplorerConfig {
    /// API endpoint.
    pub base_url: String,
    /// API key sent as `apikey`.
    pub api_key: String,
    /// Minimum delay between requests. Raised to 300ms if lower.
    pub request_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ExplorerConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.etherscan.io/api";

    /// Create a config for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            request_interval: MIN_REQUEST_INTERVAL,
            timeout: Duration::from_secs(20),
        }
    }
}

impl std::fmt::Debug for ExplorerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("request_interval", &self.request_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for an Etherscan-compatible explorer.
pub struct ExplorerClient {
    config: ExplorerConfig,
    http: Client,
    throttle: RequestThrottle,
}

impl ExplorerClient {
    /// Create a new client.
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplorerError::Http(format!("Failed to build client: {}", e)))?;
        let throttle = RequestThrottle::new(config.request_interval);

        Ok(Self {
            config,
            http,
            throttle,
        })
    }

    /// Query parameters for one listing request.
    fn query(&self, class: TxClass, address: &WalletAddress, limit: u32) -> Vec<(&'static str, String)> {
        vec![
            ("module", "account".to_string()),
            ("action", action_for(class).to_string()),
            ("address", address.to_string()),
            ("page", "1".to_string()),
            ("offset", limit.to_string()),
            ("sort", "desc".to_string()),
            ("apikey", self.config.api_key.clone()),
        ]
    }

    /// Fetch one raw response body.
    async fn fetch_body(
        &self,
        class: TxClass,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<String, ExplorerError> {
        self.throttle.acquire().await;
        debug!(wallet = %address, class = %class, limit, "Fetching explorer page");

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&self.query(class, address, limit))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExplorerError::Http(format!("HTTP {}: {}", status, body)));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TransactionSource for ExplorerClient {
    async fn native_transfers(
        &self,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<Vec<NativeTransfer>, ExplorerError> {
        let body = self.fetch_body(TxClass::Native, address, limit).await?;
        let page = decode_native_page(&body)?;
        debug!(wallet = %address, count = page.len(), "Fetched native transfers");
        Ok(page)
    }

    async fn token_transfers(
        &self,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<Vec<TokenTransfer>, ExplorerError> {
        let body = self.fetch_body(TxClass::Token, address, limit).await?;
        let page = decode_token_page(&body)?;
        debug!(wallet = %address, count = page.len(), "Fetched token transfers");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_action_for() {
        assert_eq!(action_for(TxClass::Native), "txlist");
        assert_eq!(action_for(TxClass::Token), "tokentx");
    }

    #[test]
    fn test_explorer_config_default() {
        let config = ExplorerConfig::new("KEY");
        assert_eq!(config.base_url, "https://api.etherscan.io/api");
        assert_eq!(config.api_key, "KEY");
        assert_eq!(config.request_interval, Duration::from_millis(300));
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_explorer_config_debug_redacts_key() {
        let config = ExplorerConfig::new("SECRET");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn test_query_parameters() {
        let client = ExplorerClient::new(ExplorerConfig::new("KEY")).unwrap();
        let address = WalletAddress::parse("0xABC").unwrap();
        let query = client.query(TxClass::Token, &address, 10);
        assert_eq!(
            query,
            vec![
                ("module", "account".to_string()),
                ("action", "tokentx".to_string()),
                ("address", "0xabc".to_string()),
                ("page", "1".to_string()),
                ("offset", "10".to_string()),
                ("sort", "desc".to_string()),
                ("apikey", "KEY".to_string()),
            ]
        );
    }
}
