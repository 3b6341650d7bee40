use crate::{
    db::traits::{InsertOrderResult, LedgerError},
    db_types::{NewOrder, Order, OrderNumber},
};

/// The `OrderManagement` trait defines the behaviour for storing and querying orders in the ledger backend.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a brand-new order with status `New`.
    ///
    /// This must be idempotent and race-free with respect to the order number: if an order with the same number
    /// already exists, whoever owns it, nothing is written and the existing order is returned as
    /// [`InsertOrderResult::AlreadyExists`].
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LedgerError>;

    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, LedgerError>;

    /// All orders uploaded by the given user, newest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LedgerError>;
}
