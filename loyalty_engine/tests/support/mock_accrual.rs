use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use loyalty_engine::{db_types::OrderNumber, AccrualClient, AccrualOutcome, AccrualStatus};
use lpg_common::Points;
use tokio::time::Instant;

/// An in-process stand-in for the accrual authority.
///
/// Answers are scripted per order number and consumed in order. Once an order's script runs out, the last answer is
/// repeated. Orders without a script get a `204`. Every call is recorded with the time it was made.
#[derive(Clone, Default)]
pub struct ScriptedAccrual {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    scripts: HashMap<String, VecDeque<AccrualOutcome>>,
    calls: Vec<(String, Instant)>,
    delay: Option<Duration>,
}

impl ScriptedAccrual {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, number: &OrderNumber, outcomes: Vec<AccrualOutcome>) -> &Self {
        let mut inner = self.inner.lock().unwrap();
        inner.scripts.insert(number.as_str().to_string(), outcomes.into());
        self
    }

    /// Every answer is delayed by `delay`
    pub fn with_delay(self, delay: Duration) -> Self {
        self.inner.lock().unwrap().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn called_numbers(&self) -> Vec<String> {
        self.calls().into_iter().map(|(n, _)| n).collect()
    }
}

impl AccrualClient for ScriptedAccrual {
    async fn query_order(&self, number: &OrderNumber) -> AccrualOutcome {
        let (outcome, delay) = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push((number.as_str().to_string(), Instant::now()));
            let outcome = match inner.scripts.get_mut(number.as_str()) {
                Some(script) if script.len() > 1 => script.pop_front().unwrap(),
                Some(script) => script.front().cloned().unwrap_or_else(processing),
                None => processing(),
            };
            (outcome, inner.delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

pub fn processing() -> AccrualOutcome {
    AccrualOutcome::Verdict { status: AccrualStatus::Processing, accrual: None }
}

pub fn registered() -> AccrualOutcome {
    AccrualOutcome::Verdict { status: AccrualStatus::Registered, accrual: None }
}

pub fn invalid() -> AccrualOutcome {
    AccrualOutcome::Verdict { status: AccrualStatus::Invalid, accrual: None }
}

pub fn processed(points: i64) -> AccrualOutcome {
    AccrualOutcome::Verdict { status: AccrualStatus::Processed, accrual: Some(Points::from_whole(points)) }
}

pub fn rate_limited(secs: u64) -> AccrualOutcome {
    AccrualOutcome::RateLimited { retry_after: Duration::from_secs(secs) }
}
