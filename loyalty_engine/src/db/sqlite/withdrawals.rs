use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewWithdrawal, OrderNumber, Withdrawal},
};

pub async fn withdrawal_exists(number: &OrderNumber, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM withdrawals WHERE order_number = $1")
        .bind(number)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

pub async fn insert_withdrawal(
    user_id: i64,
    withdrawal: NewWithdrawal,
    conn: &mut SqliteConnection,
) -> Result<Withdrawal, SqliteDatabaseError> {
    let record = sqlx::query_as::<_, Withdrawal>(
        r#"
            INSERT INTO withdrawals (order_number, user_id, sum, processed_at) VALUES ($1, $2, $3, $4)
            RETURNING order_number, user_id, sum, processed_at;
        "#,
    )
    .bind(withdrawal.order_number)
    .bind(user_id)
    .bind(withdrawal.sum)
    .bind(chrono::Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(record)
}

/// Withdrawals for the given user, most recent first.
pub async fn fetch_withdrawals_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Withdrawal>, SqliteDatabaseError> {
    let withdrawals = sqlx::query_as::<_, Withdrawal>(
        r#"
            SELECT order_number, user_id, sum, processed_at FROM withdrawals
            WHERE user_id = $1
            ORDER BY processed_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(withdrawals)
}
