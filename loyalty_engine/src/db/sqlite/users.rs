use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewUser, User},
};

/// Inserts the user. Returns `None` if the login is already taken.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (login, password_hash, created_at) VALUES ($1, $2, $3)
            ON CONFLICT (login) DO NOTHING
            RETURNING id, login, password_hash, created_at;
        "#,
    )
    .bind(user.login)
    .bind(user.password_hash)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    Ok(user)
}

pub async fn fetch_user_by_login(login: &str, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let user = sqlx::query_as::<_, User>("SELECT id, login, password_hash, created_at FROM users WHERE login = $1")
        .bind(login)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}
