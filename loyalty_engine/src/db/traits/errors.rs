use lpg_common::Points;
use thiserror::Error;

use crate::db_types::OrderNumber;

/// Errors that a ledger backend can report through the ledger traits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User #{0} does not exist")]
    UserNotFound(i64),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderNumber),
    #[error("The login '{0}' is already taken")]
    LoginTaken(String),
    #[error("Insufficient funds. Requested {requested}, but only {available} is available")]
    InsufficientFunds { requested: Points, available: Points },
    #[error("Order {0} has already been used for a withdrawal")]
    DuplicateWithdrawal(OrderNumber),
}
