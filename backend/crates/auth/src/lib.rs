//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Passwordless login: emailed one-time passcodes, implicit signup
//! - HMAC-signed bearer tokens (7-day TTL)
//! - Automatic 5-hour suspension after repeated OTP mismatches
//! - Referral codes with point accrual and subscription rewards
//! - Role-based access (User, AssistantAdmin, Admin, SuperAdmin)
//!
//! ## Security Model
//! - OTP codes are single-use, 6 digits, 5-minute expiry
//! - Roles are re-resolved from storage on every protected call, so a
//!   ban or grant revocation takes effect immediately
//! - OTP issuance rate-limited per client IP

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthStore;
pub use presentation::router::{admin_router, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthStore as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
