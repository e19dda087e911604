//! Billing Error Types
//!
//! This module provides billing-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Billing-specific result type alias
pub type BillingResult<T> = Result<T, BillingError>;

/// Billing-specific error variants
#[derive(Debug, Error)]
pub enum BillingError {
    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Transaction not found
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Owning account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Transaction already reviewed (terminal state)
    #[error("Transaction has already been reviewed")]
    AlreadyReviewed,

    /// Error surfaced by the auth crate (account store, role checks)
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BillingError::Validation(_) => StatusCode::BAD_REQUEST,
            BillingError::TransactionNotFound | BillingError::AccountNotFound => {
                StatusCode::NOT_FOUND
            }
            BillingError::AlreadyReviewed => StatusCode::CONFLICT,
            BillingError::Auth(e) => e.status_code(),
            BillingError::Database(_) | BillingError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::Validation(_) => ErrorKind::BadRequest,
            BillingError::TransactionNotFound | BillingError::AccountNotFound => {
                ErrorKind::NotFound
            }
            BillingError::AlreadyReviewed => ErrorKind::Conflict,
            BillingError::Auth(e) => e.kind(),
            BillingError::Database(_) | BillingError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Infrastructure detail stays in the logs,
    /// the client only sees a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            BillingError::Database(_) => AppError::new(self.kind(), "Database error"),
            BillingError::Internal(_) => AppError::new(self.kind(), "Internal error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            BillingError::Database(e) => {
                tracing::error!(error = %e, "Billing database error");
            }
            BillingError::Internal(msg) => {
                tracing::error!(message = %msg, "Billing internal error");
            }
            BillingError::AlreadyReviewed => {
                tracing::warn!("Repeated review attempt on terminal transaction");
            }
            _ => {
                tracing::debug!(error = %self, "Billing error");
            }
        }
    }
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        match self {
            // Auth errors carry their own body extras
            BillingError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_detail_is_withheld() {
        let app = BillingError::Database(sqlx::Error::RowNotFound).to_app_error();
        assert_eq!(app.message(), "Database error");

        let app = BillingError::Internal("connection reset".to_string()).to_app_error();
        assert_eq!(app.message(), "Internal error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let app = BillingError::AlreadyReviewed.to_app_error();
        assert_eq!(app.message(), "Transaction has already been reviewed");
    }
}
