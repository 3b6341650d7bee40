use std::time::Duration;

use lpg_common::Points;
use reqwest::{
    header::{HeaderMap, RETRY_AFTER},
    StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::db_types::OrderNumber;

/// Back-off applied when a `429` response carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);
/// Upper bound on a `Retry-After` back-off. Larger values are clamped to this.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60 * 60);

/// The accrual authority's view of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccrualStatus {
    Registered,
    Processing,
    Invalid,
    Processed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualResponse {
    pub order: String,
    pub status: AccrualStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
}

/// A normalized answer from the accrual authority for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccrualOutcome {
    Verdict { status: AccrualStatus, accrual: Option<Points> },
    /// The authority asked us to stop sending queries for `retry_after`. This applies to every order.
    RateLimited { retry_after: Duration },
    /// Anything that does not tell us about the order: network errors, timeouts, unexpected status codes or bodies.
    TransientError(String),
}

impl AccrualOutcome {
    pub fn transient<S: Into<String>>(reason: S) -> Self {
        Self::TransientError(reason.into())
    }
}

/// Reads the `Retry-After` header as a whole number of seconds, capped at [`MAX_RETRY_AFTER`]. HTTP dates are not
/// supported and, like a missing header, fall back to [`DEFAULT_RETRY_AFTER`].
pub fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Classifies a raw response to a query for `number`.
pub fn classify_response(number: &OrderNumber, status: StatusCode, headers: &HeaderMap, body: &[u8]) -> AccrualOutcome {
    match status {
        StatusCode::OK => parse_body(number, body),
        StatusCode::NO_CONTENT => AccrualOutcome::Verdict { status: AccrualStatus::Processing, accrual: None },
        StatusCode::TOO_MANY_REQUESTS => AccrualOutcome::RateLimited { retry_after: retry_after(headers) },
        code => AccrualOutcome::transient(format!("unexpected status code {code}")),
    }
}

fn parse_body(number: &OrderNumber, body: &[u8]) -> AccrualOutcome {
    let response = match serde_json::from_slice::<AccrualResponse>(body) {
        Ok(r) => r,
        Err(e) => return AccrualOutcome::transient(format!("could not parse response body. {e}")),
    };
    if response.order != number.as_str() {
        return AccrualOutcome::transient(format!("response is for order {}, not {number}", response.order));
    }
    if response.accrual.is_some_and(|a| a.is_negative()) {
        return AccrualOutcome::transient(format!("negative accrual for order {number}"));
    }
    AccrualOutcome::Verdict { status: response.status, accrual: response.accrual }
}
