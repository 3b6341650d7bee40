use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{InsertOrderResult, OrderManagement},
    db_types::{NewOrder, Order, OrderNumber},
    lpe_api::errors::OrderFlowError,
};

/// The result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The order is new, and is now waiting to be reconciled.
    Accepted(Order),
    /// The caller had already uploaded this order. Nothing was changed.
    AlreadyUploadedBySameUser(Order),
}

/// `OrderFlowApi` is the entry point for new orders. Once an order is accepted, only the reconciliation engine changes
/// it.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Uploads the order number `number` on behalf of `user_id`.
    ///
    /// The number is checked against the Luhn checksum before anything touches the ledger. Order numbers are unique
    /// across all users:
    /// * uploading a number you already uploaded returns [`UploadOutcome::AlreadyUploadedBySameUser`],
    /// * uploading a number someone else uploaded fails with [`OrderFlowError::AlreadyUploadedByOtherUser`].
    ///
    /// Neither case changes the ledger.
    pub async fn upload_order(&self, user_id: i64, number: &str) -> Result<UploadOutcome, OrderFlowError> {
        if number.trim().is_empty() {
            return Err(OrderFlowError::EmptyOrderNumber);
        }
        let number = number.parse::<OrderNumber>()?;
        match self.db.insert_order(NewOrder::new(number.clone(), user_id)).await? {
            InsertOrderResult::Inserted(order) => {
                info!("📦️ Order {number} uploaded by user #{user_id}");
                Ok(UploadOutcome::Accepted(order))
            },
            InsertOrderResult::AlreadyExists(order) if order.user_id == user_id => {
                debug!("📦️ User #{user_id} uploaded order {number} again");
                Ok(UploadOutcome::AlreadyUploadedBySameUser(order))
            },
            InsertOrderResult::AlreadyExists(order) => {
                warn!("📦️ User #{user_id} tried to upload order {number}, which belongs to user #{}", order.user_id);
                Err(OrderFlowError::AlreadyUploadedByOtherUser(number))
            },
        }
    }

    /// The user's orders, newest first.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        trace!("📦️ User #{user_id} has {} orders", orders.len());
        Ok(orders)
    }

    pub async fn order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderFlowError> {
        let order = self.db.fetch_order_by_number(number).await?;
        Ok(order)
    }
}
