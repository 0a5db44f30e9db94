//! Per-wallet processing: fetch, detect, notify.

use crate::config::AppConfig;
use tracing::{debug, info, warn};
use wallet_watch_alerts::{MessageFormatter, NotificationSink};
use wallet_watch_core::{Transaction, TxClass, WalletAddress};
use wallet_watch_engine::{ChangeDetector, DetectorConfig, Outcome, WalletState};
use wallet_watch_explorer::{ExplorerError, TransactionSource};

/// Counters for a single processed wallet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalletReport {
    /// New transactions detected across both classes.
    pub detected: usize,
    /// Notifications accepted by the sink.
    pub delivered: usize,
    /// Notifications the sink rejected.
    pub failed: usize,
    /// Classes whose marker scrolled off the fetched page.
    pub gaps: usize,
}

/// Processes one wallet at a time against a transaction source and sink.
pub struct WalletProcessor<'a, S: ?Sized, N: ?Sized> {
    source: &'a S,
    sink: &'a N,
    detector: ChangeDetector,
    formatter: MessageFormatter,
    page_size: u32,
}

impl<'a, S, N> WalletProcessor<'a, S, N>
where
    S: TransactionSource + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(source: &'a S, sink: &'a N, config: &AppConfig) -> Self {
        Self {
            source,
            sink,
            detector: ChangeDetector::new(DetectorConfig {
                init_mode: config.init_mode,
            }),
            formatter: MessageFormatter::new(config.tx_url.clone()),
            page_size: config.page_size,
        }
    }

    /// Process a wallet, returning its next state and counters.
    ///
    /// Both pages are fetched before anything is sent, so a fetch error
    /// leaves the wallet untouched: no notifications and no state change.
    pub async fn process(
        &self,
        wallet: &WalletAddress,
        previous: &WalletState,
    ) -> Result<(WalletState, WalletReport), ExplorerError> {
        let natives = self.source.native_transfers(wallet, self.page_size).await?;
        let tokens = self.source.token_transfers(wallet, self.page_size).await?;
        debug!(
            wallet = %wallet,
            native = natives.len(),
            token = tokens.len(),
            "Fetched transaction pages"
        );

        let mut state = previous.clone();
        let mut report = WalletReport::default();

        self.announce(wallet, TxClass::Native, &natives, &mut state, &mut report, |tx| {
            self.formatter.native(wallet, tx)
        })
        .await;
        self.announce(wallet, TxClass::Token, &tokens, &mut state, &mut report, |tx| {
            self.formatter.token(wallet, tx)
        })
        .await;

        Ok((state, report))
    }

    /// Detect new transactions of one class and send one message per item,
    /// oldest first. The marker advances whatever the delivery outcome.
    async fn announce<T, F>(
        &self,
        wallet: &WalletAddress,
        class: TxClass,
        page: &[T],
        state: &mut WalletState,
        report: &mut WalletReport,
        format: F,
    ) where
        T: Transaction,
        F: Fn(&T) -> String,
    {
        let detection = self.detector.detect(page, state.marker(class));

        match detection.outcome {
            Outcome::ColdStartSilent => {
                info!(wallet = %wallet, class = %class, "Baseline recorded without notifications");
            }
            Outcome::ScrolledOff => {
                report.gaps += 1;
                warn!(
                    wallet = %wallet,
                    class = %class,
                    fetched = page.len(),
                    "Last seen transaction not in fetched page, transactions may have been missed"
                );
            }
            _ => {}
        }

        report.detected += detection.len();
        for &tx in &detection.new_items {
            if self.sink.send(&format(tx)).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
                warn!(wallet = %wallet, class = %class, hash = tx.hash(), "Notification not delivered");
            }
        }

        if let Some(marker) = detection.marker {
            state.set_marker(class, marker);
        }
    }
}
