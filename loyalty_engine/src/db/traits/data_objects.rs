use lpg_common::Points;

use crate::db_types::Order;

/// The result of an idempotent order insert. In both cases the stored order is returned, so that the caller can check
/// who owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOrderResult {
    Inserted(Order),
    AlreadyExists(Order),
}

/// The result of applying a verdict to an order in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictResult {
    /// The order changed status. `credited` is the amount added to the owner's balance in the same transaction, if
    /// any.
    Applied { order: Order, credited: Option<Points> },
    /// The order was already in the verdict's status (only possible for `Processing`). Nothing was written.
    Unchanged(Order),
    /// The order had already reached a terminal status. Nothing was written, and in particular nothing was credited.
    AlreadyFinal(Order),
}
