use lpg_common::Points;
use thiserror::Error;

use crate::{
    db::traits::LedgerError,
    db_types::{InvalidOrderNumber, OrderNumber},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No order number was provided")]
    EmptyOrderNumber,
    #[error(transparent)]
    InvalidOrderNumber(#[from] InvalidOrderNumber),
    #[error("Order {0} has already been uploaded by another user")]
    AlreadyUploadedByOtherUser(OrderNumber),
}

impl From<LedgerError> for OrderFlowError {
    fn from(e: LedgerError) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User #{0} does not exist")]
    UserNotFound(i64),
    #[error(transparent)]
    InvalidOrderNumber(#[from] InvalidOrderNumber),
    #[error("Withdrawal amounts must be positive, but got {0}")]
    InvalidAmount(Points),
    #[error("Insufficient funds. Requested {requested}, but only {available} is available")]
    InsufficientFunds { requested: Points, available: Points },
    #[error("Order {0} has already been used for a withdrawal")]
    DuplicateWithdrawal(OrderNumber),
}

impl From<LedgerError> for AccountApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::UserNotFound(id) => AccountApiError::UserNotFound(id),
            LedgerError::InsufficientFunds { requested, available } => {
                AccountApiError::InsufficientFunds { requested, available }
            },
            LedgerError::DuplicateWithdrawal(number) => AccountApiError::DuplicateWithdrawal(number),
            e => AccountApiError::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The login and password must not be empty")]
    EmptyCredentials,
    #[error("The login '{0}' is already taken")]
    LoginTaken(String),
}

impl From<LedgerError> for AuthApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::LoginTaken(login) => AuthApiError::LoginTaken(login),
            e => AuthApiError::DatabaseError(e.to_string()),
        }
    }
}
