use chrono::Utc;
use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::InsertOrderResult},
    db_types::{NewOrder, Order, OrderNumber, OrderVerdict},
};

const ORDER_COLUMNS: &str = "number, user_id, status, accrual, uploaded_at, updated_at";

/// Inserts the order if no order with the same number exists. The check and the insert are a single statement, so two
/// concurrent uploads of the same number cannot both succeed.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, SqliteDatabaseError> {
    let inserted = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (number, user_id, status, uploaded_at, updated_at)
            VALUES ($1, $2, 'NEW', $3, $3)
            ON CONFLICT (number) DO NOTHING
            RETURNING number, user_id, status, accrual, uploaded_at, updated_at;
        "#,
    )
    .bind(&order.number)
    .bind(order.user_id)
    .bind(order.uploaded_at)
    .fetch_optional(&mut *conn)
    .await?;
    match inserted {
        Some(o) => Ok(InsertOrderResult::Inserted(o)),
        None => {
            let existing = fetch_order_by_number(&order.number, conn).await?.ok_or_else(|| {
                SqliteDatabaseError::QueryError(format!("Order {} conflicted on insert but cannot be read", order.number))
            })?;
            Ok(InsertOrderResult::AlreadyExists(existing))
        },
    }
}

pub async fn fetch_order_by_number(
    number: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE number = $1"))
        .bind(number)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Orders for the given user, most recently uploaded first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, SqliteDatabaseError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY uploaded_at DESC, rowid DESC"
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Orders in `NEW` or `PROCESSING`, oldest upload first.
pub async fn fetch_non_terminal_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, SqliteDatabaseError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status IN ('NEW', 'PROCESSING') ORDER BY uploaded_at ASC, rowid ASC"
    ))
    .fetch_all(conn)
    .await?;
    trace!("🗃️ {} orders are awaiting a verdict", orders.len());
    Ok(orders)
}

/// Writes the verdict's status (and accrual) to the order, but only if the order is not terminal and not already in
/// that status. Returns the updated order, or `None` if the guard failed and nothing was written.
pub async fn update_order_status(
    number: &OrderNumber,
    verdict: OrderVerdict,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
            UPDATE orders SET status = $1, accrual = $2, updated_at = $3
            WHERE number = $4 AND status IN ('NEW', 'PROCESSING') AND status <> $1
            RETURNING {ORDER_COLUMNS};
        "#
    ))
    .bind(verdict.status())
    .bind(verdict.accrual())
    .bind(Utc::now())
    .bind(number)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
