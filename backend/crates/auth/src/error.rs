//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde_json::json;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Account is suspended
    #[error("Account is suspended: {reason}")]
    Suspended {
        reason: String,
        expires_at: Option<DateTime<Utc>>,
    },

    /// No active OTP, or the active OTP has lapsed
    #[error("OTP expired, request a new one")]
    OtpExpired,

    /// Submitted OTP does not match
    #[error("Invalid OTP")]
    InvalidOtp { attempts_remaining: u16 },

    /// OTP mail could not be delivered
    #[error("Failed to deliver OTP email")]
    Delivery,

    /// Bearer token missing, malformed, expired, or forged
    #[error("Invalid or expired token")]
    TokenInvalid,

    /// Caller lacks the role the route requires
    #[error("Insufficient permissions")]
    Forbidden,

    /// Too many OTP requests from this client
    #[error("Too many requests, try again later")]
    RateLimited,

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::Suspended { .. } => StatusCode::FORBIDDEN,
            AuthError::OtpExpired => StatusCode::GONE,
            AuthError::InvalidOtp { .. } | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::Delivery => StatusCode::BAD_GATEWAY,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::Suspended { .. } | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::OtpExpired => ErrorKind::Gone,
            AuthError::InvalidOtp { .. } | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::Delivery => ErrorKind::BadGateway,
            AuthError::RateLimited => ErrorKind::TooManyRequests,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Infrastructure detail stays in the logs,
    /// the client only sees a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) => AppError::new(self.kind(), "Database error"),
            AuthError::Internal(_) => AppError::new(self.kind(), "Internal error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Delivery => {
                tracing::error!("OTP delivery failure");
            }
            AuthError::Suspended { reason, .. } => {
                tracing::warn!(reason = %reason, "Request from suspended account");
            }
            AuthError::InvalidOtp { attempts_remaining } => {
                tracing::warn!(attempts_remaining, "OTP mismatch");
            }
            AuthError::RateLimited => {
                tracing::warn!("OTP request rate limited");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        // Variants the client branches on carry extra fields in the body.
        match &self {
            AuthError::Suspended { reason, expires_at } => {
                let body = json!({
                    "error": self.to_string(),
                    "banned": true,
                    "reason": reason,
                    "banExpiresAtMs": expires_at.map(|at| at.timestamp_millis()),
                });
                (self.status_code(), Json(body)).into_response()
            }
            AuthError::InvalidOtp { attempts_remaining } => {
                let body = json!({
                    "error": self.to_string(),
                    "attemptsRemaining": attempts_remaining,
                });
                (self.status_code(), Json(body)).into_response()
            }
            _ => self.to_app_error().into_response(),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::mailer::MailerError> for AuthError {
    fn from(err: platform::mailer::MailerError) -> Self {
        tracing::error!(error = %err, "Mailer failure");
        AuthError::Delivery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_detail_is_withheld() {
        let app = AuthError::Database(sqlx::Error::RowNotFound).to_app_error();
        assert_eq!(app.message(), "Database error");

        let app = AuthError::Internal("pool timed out".to_string()).to_app_error();
        assert_eq!(app.message(), "Internal error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let app = AuthError::AccountNotFound.to_app_error();
        assert_eq!(app.message(), "Account not found");

        let app = AuthError::Validation("email is required".to_string()).to_app_error();
        assert_eq!(app.message(), "email is required");
    }
}
