use thiserror::Error;

use crate::db::traits::LedgerError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Database query error: {0}")]
    QueryError(String),
}

impl From<SqliteDatabaseError> for LedgerError {
    fn from(e: SqliteDatabaseError) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
