//! Transaction classes and records returned by the explorer.

use crate::format;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Transaction class tracked independently per wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxClass {
    /// Native-currency transfers and contract calls.
    Native,
    /// ERC-20 token transfers.
    Token,
}

impl TxClass {
    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TxClass::Native => "native",
            TxClass::Token => "token",
        }
    }
}

impl std::fmt::Display for TxClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything identified by a transaction hash.
pub trait Transaction {
    /// Transaction hash, unique within its class.
    fn hash(&self) -> &str;
}

/// Native-currency transfer.
///
/// Numeric fields are kept as the raw strings the explorer returned; the
/// display helpers degrade to zero instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTransfer {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Value in wei.
    pub value: String,
    /// Epoch seconds.
    pub timestamp: String,
}

impl NativeTransfer {
    /// Value in ether, `0.0` if the raw value is malformed.
    pub fn ether(&self) -> f64 {
        format::wei_to_ether(&self.value)
    }
}

impl Transaction for NativeTransfer {
    fn hash(&self) -> &str {
        &self.hash
    }
}

/// ERC-20 token transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Raw integer amount, scaled by `decimals`.
    pub value: String,
    pub decimals: String,
    pub symbol: Option<CompactString>,
    /// Epoch seconds.
    pub timestamp: String,
}

impl TokenTransfer {
    /// Placeholder used when the explorer omits the symbol.
    pub const UNKNOWN_SYMBOL: &'static str = "TOKEN";

    /// Scaled amount, `0.0` if value or decimals are malformed.
    pub fn amount(&self) -> f64 {
        format::scaled_amount(&self.value, &self.decimals)
    }

    /// Upper-cased symbol, or `TOKEN` when missing.
    pub fn display_symbol(&self) -> CompactString {
        match self.symbol.as_deref().map(str::trim) {
            Some(symbol) if !symbol.is_empty() => CompactString::new(symbol.to_uppercase()),
            _ => CompactString::new(Self::UNKNOWN_SYMBOL),
        }
    }
}

impl Transaction for TokenTransfer {
    fn hash(&self) -> &str {
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(symbol: Option<&str>, value: &str, decimals: &str) -> TokenTransfer {
        TokenTransfer {
            hash: "0xabc".to_string(),
            from: String::new(),
            to: String::new(),
            value: value.to_string(),
            decimals: decimals.to_string(),
            symbol: symbol.map(CompactString::new),
            timestamp: "0".to_string(),
        }
    }

    #[test]
    fn test_tx_class_as_str() {
        assert_eq!(TxClass::Native.as_str(), "native");
        assert_eq!(TxClass::Token.as_str(), "token");
    }

    #[test]
    fn test_native_ether() {
        let tx = NativeTransfer {
            hash: "0x1".to_string(),
            from: String::new(),
            to: String::new(),
            value: "1500000000000000000".to_string(),
            timestamp: "0".to_string(),
        };
        assert_eq!(tx.ether(), 1.5);
        assert_eq!(tx.hash(), "0x1");
    }

    #[test]
    fn test_native_ether_malformed_is_zero() {
        let tx = NativeTransfer {
            hash: "0x1".to_string(),
            from: String::new(),
            to: String::new(),
            value: "not-a-number".to_string(),
            timestamp: "0".to_string(),
        };
        assert_eq!(tx.ether(), 0.0);
    }

    #[test]
    fn test_token_display_symbol() {
        assert_eq!(token(Some("usdc"), "0", "6").display_symbol(), "USDC");
        assert_eq!(token(None, "0", "6").display_symbol(), "TOKEN");
        assert_eq!(token(Some("  "), "0", "6").display_symbol(), "TOKEN");
    }

    #[test]
    fn test_token_amount() {
        assert_eq!(token(Some("USDC"), "2500000", "6").amount(), 2.5);
        assert_eq!(token(Some("USDC"), "2500000", "bogus").amount(), 0.0);
    }
}
