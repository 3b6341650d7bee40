//! # Accrual client
//!
//! The accrual authority is an external black box. For a given order number it answers
//! `GET {base}/api/orders/{number}` with one of:
//!
//! * `200` and a body `{"order": "...", "status": "REGISTERED|PROCESSING|INVALID|PROCESSED", "accrual": 500}`
//! * `204` if it has nothing to say about the order yet
//! * `429` with a `Retry-After` header (seconds) when it wants the whole client to back off
//! * anything else, which is treated as a transient failure
//!
//! [`classify_response`] turns such a response into an [`AccrualOutcome`]. Raw status strings never leave this module.
mod client;
mod errors;
mod response;

pub use client::{AccrualClient, HttpAccrualClient};
pub use errors::AccrualClientError;
pub use response::{
    classify_response,
    retry_after,
    AccrualOutcome,
    AccrualResponse,
    AccrualStatus,
    DEFAULT_RETRY_AFTER,
    MAX_RETRY_AFTER,
};
