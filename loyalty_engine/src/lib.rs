//! Loyalty Engine
//!
//! The loyalty engine keeps a local ledger of purchase orders and point balances consistent with an external accrual
//! authority. Users upload order numbers; the authority eventually decides whether each order earns points, and how
//! many; the engine credits each user's balance exactly once per accrued order.
//!
//! The library is divided into four sections:
//! 1. Ledger management ([`mod@db`]). The ledger contracts are traits, and SQLite is the supported backend. The data
//!    types stored in the ledger live in [`db_types`] and are public.
//! 2. The accrual client ([`accrual`]), which queries the authority and normalizes its answers.
//! 3. Reconciliation ([`reconciliation`]): the status state machine and the scheduler that drives non-terminal orders
//!    through it.
//! 4. The public API used by the server ([`mod@lpe_api`]): order uploads, balances, withdrawals and users.
pub mod accrual;
pub mod db;
pub mod db_types;
pub mod helpers;
pub mod lpe_api;
pub mod reconciliation;

pub use accrual::{AccrualClient, AccrualOutcome, AccrualStatus, HttpAccrualClient};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{
    AccountManagement,
    AuthManagement,
    InsertOrderResult,
    LedgerError,
    OrderManagement,
    ReconciliationDatabase,
    VerdictResult,
};
pub use lpe_api::{
    accounts_api::AccountApi,
    auth_api::AuthApi,
    errors::{AccountApiError, AuthApiError, OrderFlowError},
    order_flow_api::{OrderFlowApi, UploadOutcome},
};
pub use reconciliation::{
    Backoff,
    PassSummary,
    Reconciler,
    ReconcilerConfig,
    ReconciliationError,
    MAX_POLL_INTERVAL,
};
