//! Wallet address normalization.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while parsing a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("wallet address is empty")]
    Empty,
}

/// A wallet address, normalized to lowercase.
///
/// Addresses are compared and stored in their lowercase form, so
/// `0xAbC...` and `0xabc...` refer to the same wallet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and normalize an address. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Normalized (lowercase) form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this looks like an EVM address (`0x` + 40 hex digits).
    pub fn is_evm(&self) -> bool {
        self.0.len() == 42
            && self.0.starts_with("0x")
            && self.0[2..].bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a comma-separated wallet list.
///
/// Blank entries are skipped and repeated addresses are kept only once,
/// preserving the order of first occurrence.
pub fn parse_wallet_list(raw: &str) -> Vec<WalletAddress> {
    let mut wallets: Vec<WalletAddress> = Vec::new();
    for entry in raw.split(',') {
        let Ok(address) = WalletAddress::parse(entry) else {
            continue;
        };
        if !wallets.contains(&address) {
            wallets.push(address);
        }
    }
    wallets
}
