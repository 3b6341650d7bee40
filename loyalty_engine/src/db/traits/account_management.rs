use lpg_common::Points;

use crate::{
    db::traits::LedgerError,
    db_types::{Balance, NewWithdrawal, Withdrawal},
};

/// The `AccountManagement` trait defines behaviour for user balances and withdrawals.
///
/// A balance row exists for every user. `current` is increased only by reconciliation credits, and `current` and
/// `withdrawn` change together only via [`AccountManagement::withdraw`].
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Fetches the balance for the given user. If the user does not exist, `None` is returned.
    async fn fetch_balance(&self, user_id: i64) -> Result<Option<Balance>, LedgerError>;

    /// Atomically adds `amount` to the user's current balance. `withdrawn` is never touched. Returns the new balance.
    ///
    /// Reconciliation credits go through [`crate::ReconciliationDatabase::apply_verdict`] instead, so that the credit
    /// and the order status change land together.
    async fn credit_balance(&self, user_id: i64, amount: Points) -> Result<Balance, LedgerError>;

    /// Debits `withdrawal.sum` from the user's current balance and adds it to their withdrawn total, recording the
    /// withdrawal, in one transaction. The funds check is part of the same atomic update, so concurrent withdrawals
    /// and credits can never drive `current` below zero.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] without writing anything if `current < sum`.
    async fn withdraw(&self, user_id: i64, withdrawal: NewWithdrawal) -> Result<Withdrawal, LedgerError>;

    /// All withdrawals for the given user, newest first.
    async fn fetch_withdrawals_for_user(&self, user_id: i64) -> Result<Vec<Withdrawal>, LedgerError>;
}
