//! Error types for the Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type.
///
/// Every operation exposed by the services either fully succeeds or fails
/// with exactly one of these reasons; raw storage errors never leak past the
/// `Database` variant.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Book is already borrowed by this user")]
    AlreadyBorrowed,

    #[error("No copies of this book are available")]
    Unavailable,

    #[error("Loan has already been returned")]
    AlreadyReturned,

    #[error("Fine has already been paid")]
    AlreadyPaid,

    #[error("Has open loans: {0}")]
    HasOpenLoans(String),

    #[error("Storage unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a storage error to `Conflict` when it is a unique-constraint
    /// violation (duplicate ISBN, duplicate email, second open loan for the
    /// same user/book pair), otherwise keep it as a storage failure.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(message.to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "authentication"),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, "authorization"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::AlreadyBorrowed => (StatusCode::CONFLICT, "already_borrowed"),
            AppError::Unavailable => (StatusCode::UNPROCESSABLE_ENTITY, "unavailable"),
            AppError::AlreadyReturned => (StatusCode::CONFLICT, "already_returned"),
            AppError::AlreadyPaid => (StatusCode::CONFLICT, "already_paid"),
            AppError::HasOpenLoans(_) => (StatusCode::CONFLICT, "has_open_loans"),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_unavailable")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let message = match &self {
            // Never echo storage internals to the client
            AppError::Database(_) => "Storage unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
