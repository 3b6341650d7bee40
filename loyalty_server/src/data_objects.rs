use chrono::{DateTime, Utc};
use loyalty_engine::db_types::{Order, OrderStatusType, Withdrawal};
use lpg_common::Points;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub number: String,
    pub status: OrderStatusType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            number: order.number.into(),
            status: order.status,
            accrual: order.accrual,
            uploaded_at: order.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Must pass the Luhn check, which is done by the engine so that the failure maps to a 422
    pub order: String,
    pub sum: Points,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalResponse {
    pub order: String,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

impl From<Withdrawal> for WithdrawalResponse {
    fn from(w: Withdrawal) -> Self {
        Self { order: w.order_number.into(), sum: w.sum, processed_at: w.processed_at }
    }
}
