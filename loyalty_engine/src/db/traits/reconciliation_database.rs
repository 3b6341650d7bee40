use crate::{
    db::traits::{LedgerError, VerdictResult},
    db_types::{Order, OrderNumber, OrderVerdict},
};

/// Ledger behaviour required by the reconciliation engine.
#[allow(async_fn_in_trait)]
pub trait ReconciliationDatabase {
    /// Every order that is not in a terminal status, oldest upload first.
    async fn fetch_non_terminal_orders(&self) -> Result<Vec<Order>, LedgerError>;

    /// Applies `verdict` to the order with the given number as a single unit of work:
    ///
    /// * If the order is already terminal, nothing is written and [`VerdictResult::AlreadyFinal`] is returned.
    /// * If the order is already in the verdict's status, nothing is written and [`VerdictResult::Unchanged`] is
    ///   returned.
    /// * Otherwise the status (and, for `Processed`, the accrual) is written, guarded on the row still being
    ///   non-terminal. For a `Processed` verdict with a positive amount, the owner's balance is credited in the same
    ///   transaction, and only if the guarded status write took effect.
    ///
    /// Either both the status write and the credit land, or neither does. Calling this again with the same verdict
    /// never credits twice.
    async fn apply_verdict(&self, number: &OrderNumber, verdict: OrderVerdict) -> Result<VerdictResult, LedgerError>;
}
