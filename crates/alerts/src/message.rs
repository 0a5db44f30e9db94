//! Notification text for detected transactions.

use wallet_watch_core::format::{
    escape_html, format_ether, format_timestamp, format_token_amount, short_address,
};
use wallet_watch_core::{NativeTransfer, TokenTransfer, WalletAddress};

/// Native currency symbol.
pub const NATIVE_SYMBOL: &str = "ETH";

/// Default prefix for transaction links.
pub const DEFAULT_TX_URL: &str = "https://etherscan.io/tx/";

/// Builds notification messages.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    tx_url: String,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TX_URL)
    }
}

impl MessageFormatter {
    /// Create a formatter linking transactions under `tx_url`.
    pub fn new(tx_url: impl Into<String>) -> Self {
        Self {
            tx_url: tx_url.into(),
        }
    }

    /// Explorer link for a transaction.
    pub fn tx_link(&self, hash: &str) -> String {
        format!("{}{}", self.tx_url, hash)
    }

    /// Message for a native transfer.
    ///
    /// Every explorer-supplied field is HTML-escaped.
    pub fn native(&self, wallet: &WalletAddress, tx: &NativeTransfer) -> String {
        format!(
            "🔔 <b>New Ethereum transaction</b>\n\
             👛 Wallet: <code>{}</code>\n\
             From: <code>{}</code> → To: <code>{}</code>\n\
             Value: <b>{} {}</b>\n\
             ⏱ {}\n\
             🔗 {}",
            code_address(wallet.as_str()),
            code_address(&tx.from),
            code_address(&tx.to),
            format_ether(tx.ether()),
            NATIVE_SYMBOL,
            format_timestamp(&tx.timestamp),
            escape_html(&self.tx_link(&tx.hash)),
        )
    }

    /// Message for a token transfer.
    pub fn token(&self, wallet: &WalletAddress, tx: &TokenTransfer) -> String {
        let symbol = escape_html(&tx.display_symbol());
        format!(
            "🔔 <b>Token transfer (ERC-20)</b>\n\
             👛 Wallet: <code>{}</code>\n\
             Token: <b>{}</b>\n\
             From: <code>{}</code> → To: <code>{}</code>\n\
             Amount: <b>{} {}</b>\n\
             ⏱ {}\n\
             🔗 {}",
            code_address(wallet.as_str()),
            symbol,
            code_address(&tx.from),
            code_address(&tx.to),
            format_token_amount(tx.amount()),
            symbol,
            format_timestamp(&tx.timestamp),
            escape_html(&self.tx_link(&tx.hash)),
        )
    }
}

/// Shortened address, escaped for a `<code>` span.
fn code_address(address: &str) -> String {
    escape_html(&short_address(address))
}
