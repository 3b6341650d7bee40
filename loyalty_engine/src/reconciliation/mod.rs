//! # Order reconciliation
//!
//! Orders are uploaded as `NEW` and learn their fate from the accrual authority. The [`Reconciler`] runs a pass over
//! every non-terminal order on a fixed interval, oldest upload first:
//!
//! 1. ask the authority about the order (bounded by a per-order timeout),
//! 2. decide what that means for the local state machine ([`plan_transition`]),
//! 3. apply the verdict to the ledger, crediting the owner in the same transaction if the order was processed.
//!
//! Passes never overlap. A `429` from the authority suspends all further queries (not just for the offending order)
//! for the requested period via [`Backoff`], which is owned by the scheduler and handed to each pass. Failures for one
//! order are logged and leave the order to be retried on the next pass; they never abort the pass.
mod backoff;
mod errors;
mod reconciler;
mod status_mapper;

pub use backoff::Backoff;
pub use errors::ReconciliationError;
pub use reconciler::{PassSummary, Reconciler, ReconcilerConfig, MAX_POLL_INTERVAL};
pub use status_mapper::{plan_transition, Transition};
