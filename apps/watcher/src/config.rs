//! Application configuration.
//!
//! Read once from the environment at startup and passed by reference to
//! every component.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use wallet_watch_alerts::message::DEFAULT_TX_URL;
use wallet_watch_alerts::TelegramConfig;
use wallet_watch_core::{parse_wallet_list, WalletAddress};
use wallet_watch_engine::InitMode;
use wallet_watch_explorer::ExplorerConfig;

pub const ENV_API_KEY: &str = "ETHERSCAN_KEY";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
pub const ENV_WALLETS: &str = "WALLETS";
pub const ENV_INIT_MODE: &str = "INIT_MODE";
pub const ENV_STATE_FILE: &str = "STATE_FILE";
pub const ENV_EXPLORER_API_URL: &str = "EXPLORER_API_URL";
pub const ENV_EXPLORER_TX_URL: &str = "EXPLORER_TX_URL";
pub const ENV_PAGE_SIZE: &str = "EXPLORER_PAGE_SIZE";
pub const ENV_MIN_INTERVAL_MS: &str = "EXPLORER_MIN_INTERVAL_MS";
pub const ENV_WALLET_DELAY_MS: &str = "WALLET_DELAY_MS";

/// Fatal configuration problems, detected before any work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ETHERSCAN_KEY is not set")]
    MissingApiKey,

    #[error("TELEGRAM_TOKEN/TELEGRAM_CHAT_ID are not set")]
    MissingTelegramCredentials,

    #[error("wallet list is empty, set WALLETS")]
    NoWallets,

    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Explorer endpoint, key and throttle.
    pub explorer: ExplorerConfig,
    /// Telegram destination.
    pub telegram: TelegramConfig,
    /// Wallets to watch, normalized and de-duplicated.
    pub wallets: Vec<WalletAddress>,
    /// Cold-start policy.
    pub init_mode: InitMode,
    /// Path of the durable state file.
    pub state_file: PathBuf,
    /// Prefix for transaction links in messages.
    pub tx_url: String,
    /// Transactions requested per class and wallet.
    pub page_size: u32,
    /// Delay between wallets.
    pub wallet_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            explorer: ExplorerConfig::default(),
            telegram: TelegramConfig::default(),
            wallets: Vec::new(),
            init_mode: InitMode::Silent,
            state_file: PathBuf::from("state.json"),
            tx_url: DEFAULT_TX_URL.to_string(),
            page_size: 10,
            wallet_delay: Duration::from_millis(200),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from the process environment.
    ///
    /// Telegram credentials are only required when `require_telegram` is set.
    pub fn from_env(require_telegram: bool) -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok(), require_telegram)
    }

    /// Load and validate configuration from a variable lookup.
    pub fn from_vars<F>(var: F, require_telegram: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingApiKey)?;

        let telegram = TelegramConfig {
            bot_token: get(ENV_TELEGRAM_TOKEN).unwrap_or_default(),
            chat_id: get(ENV_TELEGRAM_CHAT_ID).unwrap_or_default(),
            api_base: get(ENV_TELEGRAM_API_URL)
                .unwrap_or_else(|| TelegramConfig::DEFAULT_API_BASE.to_string()),
            ..Default::default()
        };
        if require_telegram && !telegram.has_credentials() {
            return Err(ConfigError::MissingTelegramCredentials);
        }

        let wallets = parse_wallet_list(&get(ENV_WALLETS).unwrap_or_default());
        if wallets.is_empty() {
            return Err(ConfigError::NoWallets);
        }
        for wallet in wallets.iter().filter(|w| !w.is_evm()) {
            warn!(wallet = %wallet, "Wallet does not look like an EVM address");
        }

        let init_mode = match get(ENV_INIT_MODE) {
            None => InitMode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to silent init mode");
                InitMode::Silent
            }),
        };

        let page_size: u32 = parse_positive(&get, ENV_PAGE_SIZE, defaults.page_size)?;
        let min_interval_ms: u64 = parse_positive(
            &get,
            ENV_MIN_INTERVAL_MS,
            defaults.explorer.request_interval.as_millis() as u64,
        )?;
        let wallet_delay_ms: u64 = parse_positive(
            &get,
            ENV_WALLET_DELAY_MS,
            defaults.wallet_delay.as_millis() as u64,
        )?;

        let explorer = ExplorerConfig {
            base_url: get(ENV_EXPLORER_API_URL).unwrap_or(defaults.explorer.base_url),
            api_key,
            request_interval: Duration::from_millis(min_interval_ms),
            ..defaults.explorer
        };

        Ok(Self {
            explorer,
            telegram,
            wallets,
            init_mode,
            state_file: get(ENV_STATE_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            tx_url: get(ENV_EXPLORER_TX_URL).unwrap_or(defaults.tx_url),
            page_size,
            wallet_delay: Duration::from_millis(wallet_delay_ms),
        })
    }
}

/// Parse an optional positive integer, falling back to `default` when unset.
fn parse_positive<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_API_KEY, " KEY "),
            (ENV_TELEGRAM_TOKEN, "123:abc"),
            (ENV_TELEGRAM_CHAT_ID, "42"),
            (ENV_WALLETS, "0xAAA, 0xbbb,,0xaaa"),
        ]
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.init_mode, InitMode::Silent);
        assert_eq!(config.state_file, PathBuf::from("state.json"));
        assert_eq!(config.wallet_delay, Duration::from_millis(200));
        assert_eq!(config.tx_url, "https://etherscan.io/tx/");
    }

    #[test]
    fn test_from_vars_complete() {
        let config = AppConfig::from_vars(vars(&complete()), true).unwrap();
        assert_eq!(config.explorer.api_key, "KEY");
        assert_eq!(config.explorer.base_url, "https://api.etherscan.io/api");
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.chat_id, "42");
        let wallets: Vec<&str> = config.wallets.iter().map(|w| w.as_str()).collect();
        assert_eq!(wallets, vec!["0xaaa", "0xbbb"]);
        assert_eq!(config.init_mode, InitMode::Silent);
    }

    #[test]
    fn test_missing_api_key() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != ENV_API_KEY);
        assert_eq!(
            AppConfig::from_vars(vars(&pairs), true).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != ENV_API_KEY);
        pairs.push((ENV_API_KEY, "   "));
        assert_eq!(
            AppConfig::from_vars(vars(&pairs), true).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn test_missing_telegram_credentials() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != ENV_TELEGRAM_CHAT_ID);
        assert_eq!(
            AppConfig::from_vars(vars(&pairs), true).unwrap_err(),
            ConfigError::MissingTelegramCredentials
        );
        // Not required for dry runs.
        assert!(AppConfig::from_vars(vars(&pairs), false).is_ok());
    }

    #[test]
    fn test_empty_wallet_list() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != ENV_WALLETS);
        pairs.push((ENV_WALLETS, " , ,"));
        assert_eq!(
            AppConfig::from_vars(vars(&pairs), true).unwrap_err(),
            ConfigError::NoWallets
        );
    }

    #[test]
    fn test_init_mode() {
        let mut pairs = complete();
        pairs.push((ENV_INIT_MODE, "Notify"));
        let config = AppConfig::from_vars(vars(&pairs), true).unwrap();
        assert_eq!(config.init_mode, InitMode::Notify);
    }

    #[test]
    fn test_unknown_init_mode_falls_back_to_silent() {
        let mut pairs = complete();
        pairs.push((ENV_INIT_MODE, "loud"));
        let config = AppConfig::from_vars(vars(&pairs), true).unwrap();
        assert_eq!(config.init_mode, InitMode::Silent);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = complete();
        pairs.extend([
            (ENV_STATE_FILE, "/var/lib/wallet-watch/state.json"),
            (ENV_EXPLORER_API_URL, "https://api-sepolia.etherscan.io/api"),
            (ENV_EXPLORER_TX_URL, "https://sepolia.etherscan.io/tx/"),
            (ENV_PAGE_SIZE, "25"),
            (ENV_MIN_INTERVAL_MS, "1000"),
            (ENV_WALLET_DELAY_MS, "50"),
            (ENV_TELEGRAM_API_URL, "http://localhost:8081"),
        ]);
        let config = AppConfig::from_vars(vars(&pairs), true).unwrap();
        assert_eq!(config.state_file, PathBuf::from("/var/lib/wallet-watch/state.json"));
        assert_eq!(config.explorer.base_url, "https://api-sepolia.etherscan.io/api");
        assert_eq!(config.tx_url, "https://sepolia.etherscan.io/tx/");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.explorer.request_interval, Duration::from_secs(1));
        assert_eq!(config.wallet_delay, Duration::from_millis(50));
        assert_eq!(config.telegram.api_base, "http://localhost:8081");
    }

    #[test]
    fn test_invalid_numbers() {
        for value in ["ten", "0", "-5"] {
            let mut pairs = complete();
            pairs.push((ENV_PAGE_SIZE, value));
            assert_eq!(
                AppConfig::from_vars(vars(&pairs), true).unwrap_err(),
                ConfigError::InvalidNumber {
                    key: ENV_PAGE_SIZE,
                    value: value.to_string()
                }
            );
        }
    }
}
