use std::time::Duration;

use log::*;
use reqwest::{Client, Url};

use super::{classify_response, AccrualClientError, AccrualOutcome};
use crate::db_types::OrderNumber;

/// Something that can ask the accrual authority about an order.
///
/// Implementations never fail: every problem is folded into [`AccrualOutcome::TransientError`].
#[allow(async_fn_in_trait)]
pub trait AccrualClient {
    async fn query_order(&self, number: &OrderNumber) -> AccrualOutcome;
}

#[derive(Debug, Clone)]
pub struct HttpAccrualClient {
    base_url: String,
    client: Client,
}

impl HttpAccrualClient {
    /// Creates a client for the accrual authority at `address`. If the address has no scheme, `http://` is assumed.
    /// Every request is bounded by `timeout`.
    pub fn new(address: &str, timeout: Duration) -> Result<Self, AccrualClientError> {
        let address = address.trim().trim_end_matches('/');
        if address.is_empty() {
            return Err(AccrualClientError::InvalidAddress(address.to_string()));
        }
        let base_url =
            if address.contains("://") { address.to_string() } else { format!("http://{address}") };
        Url::parse(&base_url).map_err(|e| AccrualClientError::InvalidAddress(format!("{base_url}: {e}")))?;
        let client = Client::builder().connect_timeout(timeout).timeout(timeout).build()?;
        debug!("📡️ Accrual client created for {base_url}");
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn order_url(&self, number: &OrderNumber) -> String {
        format!("{}/api/orders/{}", self.base_url, number.as_str())
    }
}

impl AccrualClient for HttpAccrualClient {
    async fn query_order(&self, number: &OrderNumber) -> AccrualOutcome {
        let url = self.order_url(number);
        trace!("📡️ GET {url}");
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return AccrualOutcome::transient(format!("request for order {number} failed. {e}")),
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return AccrualOutcome::transient(format!("could not read response for order {number}. {e}")),
        };
        let outcome = classify_response(number, status, &headers, &body);
        trace!("📡️ {status} for order {number}: {outcome:?}");
        outcome
    }
}
