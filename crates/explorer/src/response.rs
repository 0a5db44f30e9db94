//! Explorer response envelope and transaction decoding.
//!
//! The explorer wraps every listing in `{"status", "message", "result"}`.
//! All transaction fields arrive as optional strings; each one gets a
//! defined fallback here so the rest of the pipeline works with complete
//! records.

use crate::error::ExplorerError;
use compact_str::CompactString;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use wallet_watch_core::{NativeTransfer, TokenTransfer};

/// Message accompanying status `"0"` when the address simply has no activity.
pub const NO_TRANSACTIONS: &str = "No transactions found";

/// Status value the explorer uses for failures.
const STATUS_ERROR: &str = "0";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// One transaction entry as returned by `txlist` or `tokentx`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransfer {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub time_stamp: Option<String>,
    pub token_symbol: Option<String>,
    pub token_decimal: Option<String>,
}

impl RawTransfer {
    /// Hash if present and non-empty.
    fn take_hash(&mut self) -> Option<String> {
        self.hash.take().filter(|h| !h.trim().is_empty())
    }

    /// Convert into a native transfer. Entries without a hash are dropped.
    pub fn into_native(mut self) -> Option<NativeTransfer> {
        let hash = self.take_hash()?;
        Some(NativeTransfer {
            hash,
            from: self.from.unwrap_or_default().to_lowercase(),
            to: self.to.unwrap_or_default().to_lowercase(),
            value: self.value.unwrap_or_else(|| "0".to_string()),
            timestamp: self.time_stamp.unwrap_or_else(|| "0".to_string()),
        })
    }

    /// Convert into a token transfer. Entries without a hash are dropped.
    pub fn into_token(mut self) -> Option<TokenTransfer> {
        let hash = self.take_hash()?;
        Some(TokenTransfer {
            hash,
            from: self.from.unwrap_or_default().to_lowercase(),
            to: self.to.unwrap_or_default().to_lowercase(),
            value: self.value.unwrap_or_else(|| "0".to_string()),
            decimals: self.token_decimal.unwrap_or_else(|| "0".to_string()),
            symbol: self
                .token_symbol
                .filter(|s| !s.is_empty())
                .map(CompactString::from),
            timestamp: self.time_stamp.unwrap_or_else(|| "0".to_string()),
        })
    }
}

/// Unwrap the response envelope into its list of entries.
///
/// `status == "0"` with [`NO_TRANSACTIONS`] is an empty page, not an error.
pub fn decode_envelope(body: &str) -> Result<Vec<RawTransfer>, ExplorerError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if envelope.status == STATUS_ERROR {
        if envelope.message == NO_TRANSACTIONS {
            return Ok(Vec::new());
        }
        let result = match &envelope.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if result.to_lowercase().contains("rate limit") {
            return Err(ExplorerError::RateLimited(result));
        }
        return Err(ExplorerError::Status {
            message: envelope.message,
            result,
        });
    }

    let Value::Array(entries) = envelope.result else {
        return Err(ExplorerError::Malformed(format!(
            "expected result array, got {}",
            envelope.result
        )));
    };

    let mut transfers = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<RawTransfer>(entry) {
            Ok(raw) => transfers.push(raw),
            Err(e) => debug!(error = %e, "Skipping undecodable transaction entry"),
        }
    }
    Ok(transfers)
}

/// Decode a `txlist` response body, most recent first.
pub fn decode_native_page(body: &str) -> Result<Vec<NativeTransfer>, ExplorerError> {
    Ok(decode_envelope(body)?
        .into_iter()
        .filter_map(RawTransfer::into_native)
        .collect())
}

/// Decode a `tokentx` response body, most recent first.
pub fn decode_token_page(body: &str) -> Result<Vec<TokenTransfer>, ExplorerError> {
    Ok(decode_envelope(body)?
        .into_iter()
        .filter_map(RawTransfer::into_token)
        .collect())
}
