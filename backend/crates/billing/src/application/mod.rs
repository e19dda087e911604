//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod dashboard;
pub mod review_payment;
pub mod submit_payment;
pub mod summary;

// Re-exports
pub use config::{BillingConfig, Plan};
pub use dashboard::{DashboardOutput, DashboardUseCase};
pub use review_payment::{ReviewPaymentInput, ReviewPaymentUseCase};
pub use submit_payment::{SubmitPaymentInput, SubmitPaymentUseCase};
pub use summary::{SummaryOutput, SummaryUseCase};
