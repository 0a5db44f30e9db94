//! Minimum-interval request throttle.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Smallest interval the explorer tolerates between calls.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(300);

/// Enforces a fixed minimum delay between consecutive requests.
///
/// The lock is held while waiting, so concurrent callers are serialized
/// and each one observes the full interval.
#[derive(Debug)]
pub struct RequestThrottle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    /// Create a throttle. Intervals below [`MIN_REQUEST_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_REQUEST_INTERVAL),
            last_request: Mutex::new(None),
        }
    }

    /// Effective interval between requests.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a request may be sent, then record it as sent.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            let now = Instant::now();
            if ready_at > now {
                trace!(wait_ms = (ready_at - now).as_millis() as u64, "Throttling explorer request");
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(MIN_REQUEST_INTERVAL)
    }
}
