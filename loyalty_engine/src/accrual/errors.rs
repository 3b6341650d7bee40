use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccrualClientError {
    #[error("Invalid accrual system address '{0}'")]
    InvalidAddress(String),
    #[error("Could not initialise the HTTP client. {0}")]
    InitializeError(#[from] reqwest::Error),
}
