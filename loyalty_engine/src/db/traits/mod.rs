//! # Ledger contracts
//!
//! This module defines the interface contracts that ledger *backends* must satisfy for the loyalty engine.
//!
//! ## Orders
//! An order is keyed by its (globally unique) order number and owned by the user who first uploaded it. After upload
//! an order is only ever changed by the reconciliation engine, and only until it reaches a terminal status.
//!
//! ## Balances
//! Every user has exactly one balance row, created together with the user. It is credited by reconciliation and
//! debited by withdrawals, and both operations are atomic per row.
//!
//! ## Traits
//! * [`OrderManagement`] covers order upload and order queries.
//! * [`ReconciliationDatabase`] is what the reconciler needs: the non-terminal work queue, and an atomic
//!   "apply verdict and credit" operation.
//! * [`AccountManagement`] covers balances and withdrawals.
//! * [`AuthManagement`] covers user records.
mod account_management;
mod auth_management;
mod data_objects;
mod errors;
mod order_management;
mod reconciliation_database;

pub use account_management::AccountManagement;
pub use auth_management::AuthManagement;
pub use data_objects::{InsertOrderResult, VerdictResult};
pub use errors::LedgerError;
pub use order_management::OrderManagement;
pub use reconciliation_database::ReconciliationDatabase;
