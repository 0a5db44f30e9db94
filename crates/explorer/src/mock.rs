//! In-memory transaction source for testing.

use crate::client::TransactionSource;
use crate::error::ExplorerError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use wallet_watch_core::{NativeTransfer, TokenTransfer, TxClass, WalletAddress};

/// Mock transaction source serving preset pages.
///
/// Addresses with no preset page return an empty list.
#[derive(Default)]
pub struct MockTransactionSource {
    native: Mutex<HashMap<WalletAddress, Vec<NativeTransfer>>>,
    token: Mutex<HashMap<WalletAddress, Vec<TokenTransfer>>>,
    failing: Mutex<HashMap<(WalletAddress, TxClass), ExplorerError>>,
    calls: Mutex<Vec<(WalletAddress, TxClass)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransactionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the native page served for an address.
    pub fn set_native(&self, address: &WalletAddress, page: Vec<NativeTransfer>) {
        lock(&self.native).insert(address.clone(), page);
    }

    /// Set the token page served for an address.
    pub fn set_token(&self, address: &WalletAddress, page: Vec<TokenTransfer>) {
        lock(&self.token).insert(address.clone(), page);
    }

    /// Make requests for an address and class fail with a status error.
    pub fn fail(&self, address: &WalletAddress, class: TxClass) {
        self.fail_with(
            address,
            class,
            ExplorerError::Status {
                message: "NOTOK".to_string(),
                result: "Mock failure".to_string(),
            },
        );
    }

    /// Make requests for an address and class fail with `error`.
    pub fn fail_with(&self, address: &WalletAddress, class: TxClass, error: ExplorerError) {
        lock(&self.failing).insert((address.clone(), class), error);
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<(WalletAddress, TxClass)> {
        lock(&self.calls).clone()
    }

    fn record(&self, address: &WalletAddress, class: TxClass) -> Result<(), ExplorerError> {
        lock(&self.calls).push((address.clone(), class));
        match lock(&self.failing).get(&(address.clone(), class)) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TransactionSource for MockTransactionSource {
    async fn native_transfers(
        &self,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<Vec<NativeTransfer>, ExplorerError> {
        self.record(address, TxClass::Native)?;
        let page = lock(&self.native).get(address).cloned().unwrap_or_default();
        Ok(page.into_iter().take(limit as usize).collect())
    }

    async fn token_transfers(
        &self,
        address: &WalletAddress,
        limit: u32,
    ) -> Result<Vec<TokenTransfer>, ExplorerError> {
        self.record(address, TxClass::Token)?;
        let page = lock(&self.token).get(address).cloned().unwrap_or_default();
        Ok(page.into_iter().take(limit as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn native(hash: &str) -> NativeTransfer {
        NativeTransfer {
            hash: hash.to_string(),
            from: String::new(),
            to: String::new(),
            value: "0".to_string(),
            timestamp: "0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_source_serves_pages() {
        let source = MockTransactionSource::new();
        let address = WalletAddress::parse("0xabc").unwrap();
        source.set_native(&address, vec![native("0x2"), native("0x1")]);

        let page = source.native_transfers(&address, 10).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(source.token_transfers(&address, 10).await.unwrap().is_empty());
        assert_eq!(
            source.calls(),
            vec![(address.clone(), TxClass::Native), (address, TxClass::Token)]
        );
    }

    #[tokio::test]
    async fn test_mock_source_respects_limit() {
        let source = MockTransactionSource::new();
        let address = WalletAddress::parse("0xabc").unwrap();
        source.set_native(&address, vec![native("0x3"), native("0x2"), native("0x1")]);

        let page = source.native_transfers(&address, 2).await.unwrap();
        let hashes: Vec<&str> = page.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0x3", "0x2"]);
    }

    #[tokio::test]
    async fn test_mock_source_failure() {
        let source = MockTransactionSource::new();
        let address = WalletAddress::parse("0xabc").unwrap();
        source.fail(&address, TxClass::Token);

        assert!(source.native_transfers(&address, 10).await.is_ok());
        assert!(source.token_transfers(&address, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_source_custom_failure() {
        let source = MockTransactionSource::new();
        let address = WalletAddress::parse("0xabc").unwrap();
        source.fail_with(
            &address,
            TxClass::Native,
            ExplorerError::RateLimited("Max rate limit reached".to_string()),
        );

        let err = source.native_transfers(&address, 10).await.unwrap_err();
        assert!(err.is_rate_limit());
    }
}
