pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::BillingAppState;
pub use router::{admin_router, payment_router, premium_router, user_router};
