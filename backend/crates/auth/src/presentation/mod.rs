//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthContext, AuthGateState, require_account, require_admin, require_full_admin,
    require_super_admin,
};
pub use router::{admin_router, auth_router};
