//! SQLite backend for the loyalty ledger.
//!
//! The submodules hold plain query functions that take a `&mut SqliteConnection`. They are not atomic on their own;
//! [`SqliteDatabase`] composes them inside transactions where the ledger contracts require it.
mod db;
mod errors;

pub mod balances;
pub mod orders;
pub mod users;
pub mod withdrawals;

use std::str::FromStr;

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub const DEFAULT_SQLITE_DB_URL: &str = "sqlite://data/loyalty.db";

/// Opens a connection pool to the database at `url`, creating the database file if it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    debug!("🗃️ Connection pool for {url} opened with at most {max_connections} connections");
    Ok(pool)
}
