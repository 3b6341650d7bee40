use std::{fmt::Display, time::Duration};

use log::*;
use lpg_common::Points;
use tokio::{
    sync::Mutex,
    time::{interval, timeout, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{plan_transition, Backoff, ReconciliationError, Transition};
use crate::{
    accrual::{AccrualClient, AccrualOutcome},
    db::traits::{ReconciliationDatabase, VerdictResult},
    db_types::{Order, OrderVerdict},
};

/// Longest gap between two passes. Longer poll intervals are clamped to this.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
pub struct ReconcilerConfig {
    /// Time between the starts of two passes. A pass that overruns delays the next one; passes never overlap.
    pub poll_interval: Duration,
    /// Upper bound on a single accrual query.
    pub query_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(5), query_timeout: Duration::from_secs(5) }
    }
}

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Non-terminal orders found at the start of the pass
    pub candidates: usize,
    /// Orders the accrual authority was asked about
    pub queried: usize,
    /// Orders that changed status
    pub advanced: usize,
    /// Orders whose owner received a credit
    pub credited: usize,
    pub total_credited: Points,
    /// Orders that needed no change
    pub skipped: usize,
    /// Orders that hit a transient error, or whose verdict could not be written
    pub failed: usize,
    pub rate_limited: usize,
    /// The pass stopped early because of a shutdown request
    pub cancelled: bool,
}

impl Display for PassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} candidates, {} queried, {} advanced, {} credited ({}), {} skipped, {} failed, {} rate limited",
            self.candidates,
            self.queried,
            self.advanced,
            self.credited,
            self.total_credited,
            self.skipped,
            self.failed,
            self.rate_limited
        )?;
        if self.cancelled {
            write!(f, ". Cancelled")?;
        }
        Ok(())
    }
}

/// `Reconciler` drives orders from `NEW` to a terminal state by polling the accrual authority.
///
/// It is generic over the ledger backend `B` and the accrual client `C`.
pub struct Reconciler<B, C> {
    db: B,
    client: C,
    config: ReconcilerConfig,
    pass_lock: Mutex<()>,
}

impl<B, C> Reconciler<B, C>
where
    B: ReconciliationDatabase,
    C: AccrualClient,
{
    pub fn new(db: B, client: C, config: ReconcilerConfig) -> Self {
        Self { db, client, config, pass_lock: Mutex::new(()) }
    }

    /// Runs passes every `poll_interval` until `cancel` fires. The backoff state lives for as long as this loop does.
    ///
    /// Cancellation is observed between orders, never in the middle of applying a verdict.
    pub async fn run(self, cancel: CancellationToken) {
        let mut backoff = Backoff::new();
        let period = self.config.poll_interval.clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "🔄️ Reconciliation started. Polling every {:?}, with a {:?} limit per order",
            period, self.config.query_timeout
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {},
            }
            match self.run_pass(&mut backoff, &cancel).await {
                Ok(summary) if summary.candidates == 0 => trace!("🔄️ No orders awaiting reconciliation"),
                Ok(summary) => info!("🔄️ Reconciliation pass complete. {summary}"),
                Err(e) => error!("🔄️ Reconciliation pass failed. {e}"),
            }
        }
        info!("🔄️ Reconciliation stopped");
    }

    /// Runs a single pass over every non-terminal order, oldest upload first.
    ///
    /// Only one pass can run at a time. Starting a pass while another is running fails with
    /// [`ReconciliationError::PassInProgress`]. Failures for individual orders are logged and counted in the summary;
    /// the only error returned is a failure to fetch the work queue itself.
    pub async fn run_pass(
        &self,
        backoff: &mut Backoff,
        cancel: &CancellationToken,
    ) -> Result<PassSummary, ReconciliationError> {
        let _guard = self.pass_lock.try_lock().map_err(|_| ReconciliationError::PassInProgress)?;
        let orders = self.db.fetch_non_terminal_orders().await?;
        let mut summary = PassSummary { candidates: orders.len(), ..Default::default() };
        for order in orders {
            if let Some(remaining) = backoff.remaining() {
                debug!("🔄️ Accrual queries are suspended for another {remaining:?}");
            }
            if !backoff.wait(cancel).await {
                summary.cancelled = true;
                break;
            }
            self.reconcile_order(&order, backoff, &mut summary).await;
        }
        Ok(summary)
    }

    async fn reconcile_order(&self, order: &Order, backoff: &mut Backoff, summary: &mut PassSummary) {
        let number = &order.number;
        let outcome = match timeout(self.config.query_timeout, self.client.query_order(number)).await {
            Ok(outcome) => outcome,
            Err(_) => AccrualOutcome::transient(format!("no answer within {:?}", self.config.query_timeout)),
        };
        summary.queried += 1;
        match plan_transition(order.status, &outcome) {
            Transition::Advance(verdict) => self.apply_verdict(order, verdict, summary).await,
            Transition::Unchanged | Transition::Ignore => {
                trace!("🔄️ Order {number} is still {}", order.status);
                summary.skipped += 1;
            },
            Transition::Throttle(retry_after) => {
                warn!("🔄️ The accrual system is rate limiting us. Suspending all queries for {retry_after:?}");
                backoff.suspend_for(retry_after);
                summary.rate_limited += 1;
            },
            Transition::RetryLater(reason) => {
                warn!("🔄️ Could not reconcile order {number}. It will be retried on the next pass. {reason}");
                summary.failed += 1;
            },
        }
    }

    async fn apply_verdict(&self, order: &Order, verdict: OrderVerdict, summary: &mut PassSummary) {
        let number = &order.number;
        match self.db.apply_verdict(number, verdict).await {
            Ok(VerdictResult::Applied { order: updated, credited }) => {
                summary.advanced += 1;
                match credited {
                    Some(amount) => {
                        info!("🔄️ Order {number} is {}. {amount} credited to user #{}", updated.status, updated.user_id);
                        summary.credited += 1;
                        summary.total_credited += amount;
                    },
                    None => debug!("🔄️ Order {number} is now {}", updated.status),
                }
            },
            Ok(VerdictResult::Unchanged(_)) => summary.skipped += 1,
            Ok(VerdictResult::AlreadyFinal(current)) => {
                debug!("🔄️ Order {number} was already {} when its verdict arrived", current.status);
                summary.skipped += 1;
            },
            Err(e) => {
                error!("🔄️ Could not record the verdict for order {number}. It will be retried on the next pass. {e}");
                summary.failed += 1;
            },
        }
    }
}
