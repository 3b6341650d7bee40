use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use loyalty_engine::{AccountApiError, AuthApiError, OrderFlowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    InsufficientFunds(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No access token was provided. Please log in first.")]
    MissingToken,
    #[error("Access token signature is invalid.")]
    ValidationError,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token has expired. Please log in again.")]
    TokenExpired,
    #[error("Invalid login or password.")]
    InvalidCredentials,
    #[error("Could not hash password. {0}")]
    HashError(String),
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::EmptyOrderNumber => Self::InvalidRequestBody(e.to_string()),
            OrderFlowError::InvalidOrderNumber(_) => Self::UnprocessableEntity(e.to_string()),
            OrderFlowError::AlreadyUploadedByOtherUser(_) => Self::Conflict(e.to_string()),
            OrderFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::InvalidOrderNumber(_) | AccountApiError::InvalidAmount(_) => {
                Self::UnprocessableEntity(e.to_string())
            },
            AccountApiError::InsufficientFunds { .. } => Self::InsufficientFunds(e.to_string()),
            AccountApiError::DuplicateWithdrawal(_) => Self::Conflict(e.to_string()),
            AccountApiError::UserNotFound(_) => Self::NoRecordFound(e.to_string()),
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::EmptyCredentials => Self::InvalidRequestBody(e.to_string()),
            AuthApiError::LoginTaken(_) => Self::Conflict(e.to_string()),
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
