//! `SqliteDatabase` is the concrete SQLite implementation of the ledger traits in [`crate::db::traits`].
use std::fmt::Debug;

use log::*;
use lpg_common::Points;
use sqlx::SqlitePool;

use super::{balances, new_pool, orders, users, withdrawals, SqliteDatabaseError};
use crate::{
    db::traits::{
        AccountManagement,
        AuthManagement,
        InsertOrderResult,
        LedgerError,
        OrderManagement,
        ReconciliationDatabase,
        VerdictResult,
    },
    db_types::{Balance, NewOrder, NewUser, NewWithdrawal, Order, OrderNumber, OrderVerdict, User, Withdrawal},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let number = order.number.clone();
        let result = orders::idempotent_insert(order, &mut conn).await?;
        match &result {
            InsertOrderResult::Inserted(o) => debug!("🗃️ Order {number} saved for user #{}", o.user_id),
            InsertOrderResult::AlreadyExists(o) => {
                debug!("🗃️ Order {number} already exists and belongs to user #{}", o.user_id)
            },
        }
        Ok(result)
    }

    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_number(number, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }
}

impl ReconciliationDatabase for SqliteDatabase {
    async fn fetch_non_terminal_orders(&self) -> Result<Vec<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_non_terminal_orders(&mut conn).await?;
        Ok(orders)
    }

    /// Takes a verdict for an order, and in a single atomic transaction,
    /// * writes the new status and accrual, guarded on the order still being non-terminal and not already in the
    ///   verdict's status.
    /// * credits the owner's balance if the verdict is `Processed` with a positive amount, and the guarded write
    ///   took effect.
    ///
    /// If the guard fails, the order is read back to tell the caller why.
    async fn apply_verdict(&self, number: &OrderNumber, verdict: OrderVerdict) -> Result<VerdictResult, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::update_order_status(number, verdict, &mut tx).await? else {
            let current = orders::fetch_order_by_number(number, &mut tx)
                .await?
                .ok_or_else(|| LedgerError::OrderNotFound(number.clone()))?;
            return if current.status.is_terminal() {
                debug!("🗃️ Order {number} is already {}. Verdict {verdict:?} ignored", current.status);
                Ok(VerdictResult::AlreadyFinal(current))
            } else {
                trace!("🗃️ Order {number} is still {}", current.status);
                Ok(VerdictResult::Unchanged(current))
            };
        };
        let credited = match verdict {
            OrderVerdict::Processed(amount) if amount.is_positive() => {
                let balance = balances::credit_balance(order.user_id, amount, &mut tx)
                    .await?
                    .ok_or(LedgerError::UserNotFound(order.user_id))?;
                trace!("🗃️ User #{} balance is now {}", order.user_id, balance.current);
                Some(amount)
            },
            _ => None,
        };
        tx.commit().await?;
        debug!("🗃️ Order {number} is now {}", order.status);
        Ok(VerdictResult::Applied { order, credited })
    }
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_balance(&self, user_id: i64) -> Result<Option<Balance>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let balance = balances::fetch_balance(user_id, &mut conn).await?;
        Ok(balance)
    }

    async fn credit_balance(&self, user_id: i64, amount: Points) -> Result<Balance, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let balance =
            balances::credit_balance(user_id, amount, &mut conn).await?.ok_or(LedgerError::UserNotFound(user_id))?;
        debug!("🗃️ {amount} credited to user #{user_id}");
        Ok(balance)
    }

    async fn withdraw(&self, user_id: i64, withdrawal: NewWithdrawal) -> Result<Withdrawal, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let number = withdrawal.order_number.clone();
        let sum = withdrawal.sum;
        if balances::debit_balance(user_id, sum, &mut tx).await?.is_none() {
            let available = balances::fetch_balance(user_id, &mut tx)
                .await?
                .ok_or(LedgerError::UserNotFound(user_id))?
                .current;
            info!("🗃️ User #{user_id} tried to withdraw {sum} against order {number}, but only has {available}");
            return Err(LedgerError::InsufficientFunds { requested: sum, available });
        }
        if withdrawals::withdrawal_exists(&number, &mut tx).await? {
            // `tx` is dropped without a commit, so the debit is rolled back
            return Err(LedgerError::DuplicateWithdrawal(number));
        }
        let record = withdrawals::insert_withdrawal(user_id, withdrawal, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ User #{user_id} withdrew {sum} against order {number}");
        Ok(record)
    }

    async fn fetch_withdrawals_for_user(&self, user_id: i64) -> Result<Vec<Withdrawal>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let withdrawals = withdrawals::fetch_withdrawals_for_user(user_id, &mut conn).await?;
        Ok(withdrawals)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let login = user.login.clone();
        let user = users::insert_user(user, &mut tx).await?.ok_or(LedgerError::LoginTaken(login))?;
        balances::create_balance(user.id, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ New user #{} created with login '{}'", user.id, user.login);
        Ok(user)
    }

    async fn fetch_user_by_login(&self, login: &str) -> Result<Option<User>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_login(login, &mut conn).await?;
        Ok(user)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, opening (and if necessary creating) the SQLite database at `url`.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Connection pool for {} closed", self.url);
    }
}
