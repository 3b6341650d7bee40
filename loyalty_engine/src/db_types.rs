use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use lpg_common::Points;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::helpers::luhn;

//--------------------------------------     OrderNumber       ---------------------------------------------------------
/// A purchase-order number. Order numbers are unique across the whole system, not just per user.
///
/// The only way to construct an `OrderNumber` from user input is via [`OrderNumber::from_str`], which runs the Luhn
/// checksum. Values loaded from the ledger were validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid order number: '{0}'")]
pub struct InvalidOrderNumber(pub String);

impl FromStr for OrderNumber {
    type Err = InvalidOrderNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if luhn::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidOrderNumber(s.to_string()))
        }
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = InvalidOrderNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The local lifecycle of an order: `New → Processing → {Processed, Invalid}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order has been uploaded, and the accrual authority has not been asked about it yet.
    New,
    /// The accrual authority knows about the order but has not reached a verdict.
    Processing,
    /// The accrual authority has calculated the accrual and it has been credited to the owner. Terminal.
    Processed,
    /// The accrual authority has rejected the order. Terminal.
    Invalid,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::Invalid)
    }

    /// Whether the state machine permits moving from `self` to `next`. Staying in a non-terminal state is not a
    /// transition.
    pub fn can_transition_to(&self, next: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!((self, next), (New, Processing | Processed | Invalid) | (Processing, Processed | Invalid))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatusType::New => "NEW",
            OrderStatusType::Processing => "PROCESSING",
            OrderStatusType::Processed => "PROCESSED",
            OrderStatusType::Invalid => "INVALID",
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PROCESSING" => Ok(Self::Processing),
            "PROCESSED" => Ok(Self::Processed),
            "INVALID" => Ok(Self::Invalid),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Order {
    pub number: OrderNumber,
    /// The user that first uploaded the order
    pub user_id: i64,
    pub status: OrderStatusType,
    /// Only set once the order is `Processed`
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub number: OrderNumber,
    pub user_id: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(number: OrderNumber, user_id: i64) -> Self {
        Self { number, user_id, uploaded_at: Utc::now() }
    }
}

//--------------------------------------     OrderVerdict      ---------------------------------------------------------
/// A status change for a non-terminal order, as decided by the status mapper. Applying a verdict to the ledger is the
/// only way an order's status changes after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderVerdict {
    Processing,
    Invalid,
    /// Processed, with the amount to credit to the owner. Zero is allowed and credits nothing.
    Processed(Points),
}

impl OrderVerdict {
    pub fn status(&self) -> OrderStatusType {
        match self {
            OrderVerdict::Processing => OrderStatusType::Processing,
            OrderVerdict::Invalid => OrderStatusType::Invalid,
            OrderVerdict::Processed(_) => OrderStatusType::Processed,
        }
    }

    pub fn accrual(&self) -> Option<Points> {
        match self {
            OrderVerdict::Processed(amount) => Some(*amount),
            _ => None,
        }
    }
}

//--------------------------------------       Balance         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Balance {
    /// Sum of all credited accruals, less all withdrawals. Never negative.
    pub current: Points,
    /// Running total of all withdrawals.
    pub withdrawn: Points,
}

//--------------------------------------      Withdrawal       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Withdrawal {
    pub order_number: OrderNumber,
    pub user_id: i64,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub order_number: OrderNumber,
    pub sum: Points,
}

impl NewWithdrawal {
    pub fn new(order_number: OrderNumber, sum: Points) -> Self {
        Self { order_number, sum }
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    /// The already-hashed password. The engine never sees plain-text passwords.
    pub password_hash: String,
}
