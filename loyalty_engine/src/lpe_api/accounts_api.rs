//! Balances and withdrawals.

use std::fmt::Debug;

use log::*;
use lpg_common::Points;

use crate::{
    db::traits::AccountManagement,
    db_types::{Balance, NewWithdrawal, OrderNumber, Withdrawal},
    lpe_api::errors::AccountApiError,
};

/// The `AccountApi` provides access to user balances and withdrawals.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn balance(&self, user_id: i64) -> Result<Balance, AccountApiError> {
        self.db.fetch_balance(user_id).await?.ok_or(AccountApiError::UserNotFound(user_id))
    }

    /// Withdraws `sum` points from the user's balance against the order number `order`.
    ///
    /// The number must pass the Luhn checksum and must not have been used for a withdrawal before. The sum must be
    /// positive and no larger than the current balance. The funds check and the debit are a single atomic step in the
    /// ledger.
    pub async fn withdraw(&self, user_id: i64, order: &str, sum: Points) -> Result<Withdrawal, AccountApiError> {
        let number = order.parse::<OrderNumber>()?;
        if !sum.is_positive() {
            return Err(AccountApiError::InvalidAmount(sum));
        }
        let withdrawal = self.db.withdraw(user_id, NewWithdrawal::new(number, sum)).await?;
        info!("💸️ User #{user_id} withdrew {sum} against order {}", withdrawal.order_number);
        Ok(withdrawal)
    }

    /// The user's withdrawals, newest first.
    pub async fn withdrawals_for_user(&self, user_id: i64) -> Result<Vec<Withdrawal>, AccountApiError> {
        let withdrawals = self.db.fetch_withdrawals_for_user(user_id).await?;
        trace!("💸️ User #{user_id} has {} withdrawals", withdrawals.len());
        Ok(withdrawals)
    }
}
