//! Billing (Payments & Premium) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Manual payment flow: accounts submit a payment claim with an
//!   out-of-band proof, admins approve or reject it
//! - Premium subscription grant and extension on approval
//! - Lazy premium expiry settled on the next dashboard read
//! - Public premium plan catalog
//! - Admin summary (account, queue and tip counts, grant roster)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{BillingConfig, Plan};
pub use error::{BillingError, BillingResult};
pub use infra::postgres::PgBillingStore;
pub use presentation::router::{admin_router, payment_router, premium_router, user_router};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgBillingStore as BillingStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
