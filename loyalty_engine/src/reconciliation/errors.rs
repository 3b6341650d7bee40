use thiserror::Error;

use crate::db::traits::LedgerError;

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("A reconciliation pass is already running")]
    PassInProgress,
    #[error("Could not fetch the orders awaiting reconciliation. {0}")]
    LedgerError(#[from] LedgerError),
}
