//! Single polling pass over every configured wallet.

use crate::config::AppConfig;
use crate::processor::{WalletProcessor, WalletReport};
use tracing::{error, info, warn};
use wallet_watch_alerts::NotificationSink;
use wallet_watch_engine::StateStore;
use wallet_watch_explorer::TransactionSource;

/// Aggregate counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub wallets_processed: usize,
    pub wallets_failed: usize,
    /// Wallets skipped because the explorer throttled a request.
    pub rate_limited: usize,
    pub events_detected: usize,
    pub notifications_delivered: usize,
    pub notifications_failed: usize,
    pub gaps: usize,
}

impl RunSummary {
    fn absorb(&mut self, report: WalletReport) {
        self.wallets_processed += 1;
        self.events_detected += report.detected;
        self.notifications_delivered += report.delivered;
        self.notifications_failed += report.failed;
        self.gaps += report.gaps;
    }

    pub fn log(&self) {
        info!(
            wallets = self.wallets_processed,
            failed_wallets = self.wallets_failed,
            rate_limited = self.rate_limited,
            detected = self.events_detected,
            delivered = self.notifications_delivered,
            undelivered = self.notifications_failed,
            gaps = self.gaps,
            "Run complete"
        );
    }
}

/// Process every configured wallet once, in order.
///
/// Successful wallets are committed to `store`; failures are logged and
/// leave that wallet's stored state as it was. Saving is left to the caller.
pub async fn run_once<S, N>(
    config: &AppConfig,
    source: &S,
    sink: &N,
    store: &mut StateStore,
) -> RunSummary
where
    S: TransactionSource + ?Sized,
    N: NotificationSink + ?Sized,
{
    let processor = WalletProcessor::new(source, sink, config);
    let mut summary = RunSummary::default();

    for (i, wallet) in config.wallets.iter().enumerate() {
        if i > 0 && !config.wallet_delay.is_zero() {
            tokio::time::sleep(config.wallet_delay).await;
        }

        info!(wallet = %wallet, "Checking wallet");
        let previous = store.wallet(wallet);
        match processor.process(wallet, &previous).await {
            Ok((next, report)) => {
                store.update(wallet, next);
                summary.absorb(report);
            }
            Err(e) if e.is_rate_limit() => {
                summary.wallets_failed += 1;
                summary.rate_limited += 1;
                warn!(wallet = %wallet, error = %e, "Explorer rate limit hit, wallet skipped until next run");
            }
            Err(e) => {
                summary.wallets_failed += 1;
                error!(wallet = %wallet, error = %e, "Failed to process wallet");
            }
        }
    }

    summary
}
