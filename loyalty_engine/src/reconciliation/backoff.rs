use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

// Used when `now + duration` cannot be represented. Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Global rate-limit state for the accrual client.
///
/// Holds the instant before which no accrual query may be sent. It is owned by whoever drives the reconciliation
/// passes and handed to each pass, so it survives from one pass to the next.
#[derive(Debug, Clone, Default)]
pub struct Backoff {
    resume_not_before: Option<Instant>,
}

impl Backoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspends queries for `duration` from now. An existing suspension that ends later is kept.
    pub fn suspend_for(&mut self, duration: Duration) {
        let now = Instant::now();
        let until = now.checked_add(duration).or_else(|| now.checked_add(FAR_FUTURE)).unwrap_or(now);
        self.resume_not_before = Some(self.resume_not_before.map_or(until, |t| t.max(until)));
    }

    pub fn resume_not_before(&self) -> Option<Instant> {
        self.resume_not_before
    }

    /// How much longer queries are suspended for, if at all.
    pub fn remaining(&self) -> Option<Duration> {
        self.resume_not_before
            .map(|t| t.saturating_duration_since(Instant::now()))
            .filter(|d| !d.is_zero())
    }

    /// Waits out the current suspension, if any. Returns `false` if `cancel` fired first.
    pub async fn wait(&mut self, cancel: &CancellationToken) -> bool {
        if let Some(until) = self.resume_not_before {
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = sleep_until(until) => {},
            }
            self.resume_not_before = None;
        }
        !cancel.is_cancelled()
    }
}
