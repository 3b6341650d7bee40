use chrono::Utc;
use lpg_common::Points;
use sqlx::SqliteConnection;

use crate::{db::sqlite::SqliteDatabaseError, db_types::Balance};

/// Creates the zeroed balance row for a new user.
pub async fn create_balance(user_id: i64, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO balances (user_id, current_balance, total_withdrawn, updated_at) VALUES ($1, 0, 0, $2)")
        .bind(user_id)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_balance(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Balance>, SqliteDatabaseError> {
    let row = sqlx::query_as::<_, (Points, Points)>(
        "SELECT current_balance, total_withdrawn FROM balances WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|(current, withdrawn)| Balance { current, withdrawn }))
}

/// Adds `amount` to the current balance in a single statement. Returns the new balance, or `None` if the user has no
/// balance row.
pub async fn credit_balance(
    user_id: i64,
    amount: Points,
    conn: &mut SqliteConnection,
) -> Result<Option<Balance>, SqliteDatabaseError> {
    let row = sqlx::query_as::<_, (Points, Points)>(
        r#"
            UPDATE balances SET current_balance = current_balance + $1, updated_at = $2
            WHERE user_id = $3
            RETURNING current_balance, total_withdrawn;
        "#,
    )
    .bind(amount)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|(current, withdrawn)| Balance { current, withdrawn }))
}

/// Moves `amount` from the current balance to the withdrawn total, guarded on sufficient funds. The funds check and the
/// debit are one statement. Returns the new balance, or `None` if the guard failed and nothing was written.
pub async fn debit_balance(
    user_id: i64,
    amount: Points,
    conn: &mut SqliteConnection,
) -> Result<Option<Balance>, SqliteDatabaseError> {
    let row = sqlx::query_as::<_, (Points, Points)>(
        r#"
            UPDATE balances
            SET current_balance = current_balance - $1, total_withdrawn = total_withdrawn + $1, updated_at = $2
            WHERE user_id = $3 AND current_balance >= $1
            RETURNING current_balance, total_withdrawn;
        "#,
    )
    .bind(amount)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|(current, withdrawn)| Balance { current, withdrawn }))
}
