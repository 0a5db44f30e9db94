//! Error types for explorer operations.

use thiserror::Error;

/// Errors that can occur while listing transactions.
#[derive(Debug, Clone, Error)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Explorer returned error status: {message} ({result})")]
    Status { message: String, result: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Malformed(err.to_string())
    }
}

impl ExplorerError {
    /// Returns true if the explorer throttled the request.
    /// Callers should back off until the next scheduled run.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ExplorerError::RateLimited(_))
    }
}
