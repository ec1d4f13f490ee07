use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Login failed. Unknown email and wrong password are deliberately the
    /// same error so accounts cannot be enumerated.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Missing, invalid, or expired access token, or the resolved account
    /// no longer exists or is inactive.
    #[error("not authenticated")]
    Unauthenticated,

    /// Authenticated account without a required role.
    #[error("insufficient permissions")]
    Forbidden,

    #[error("email already registered")]
    DuplicateAccount,

    /// Set-password flow rejection; opaque about the exact cause.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("email error: {0}")]
    Email(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DuplicateAccount | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidOrExpiredToken | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Email(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::DuplicateAccount => "DUPLICATE_ACCOUNT",
            AppError::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Email(_) => "EMAIL_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        // Internal error details never go over the wire.
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Email(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error, message })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<auth_core::Forbidden> for AppError {
    fn from(_: auth_core::Forbidden) -> Self {
        AppError::Forbidden
    }
}

impl From<auth_core::TokenError> for AppError {
    fn from(err: auth_core::TokenError) -> Self {
        match err {
            auth_core::TokenError::InvalidToken => AppError::Unauthenticated,
            auth_core::TokenError::Issuance(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<auth_core::HashError> for AppError {
    fn from(err: auth_core::HashError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Postgres unique-constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}
