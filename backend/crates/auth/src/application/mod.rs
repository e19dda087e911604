//! Application Layer
//!
//! Use cases and application services.

pub mod ban_account;
pub mod config;
pub mod create_assistant;
pub mod request_otp;
pub mod resolve_role;
pub mod token;
pub mod verify_otp;

// Re-exports
pub use ban_account::{BanAccountInput, BanAccountUseCase};
pub use config::AuthConfig;
pub use create_assistant::{CreateAssistantInput, CreateAssistantUseCase};
pub use request_otp::{RequestOtpInput, RequestOtpOutput, RequestOtpUseCase};
pub use resolve_role::{ResolvedRole, RoleResolver};
pub use token::{TokenClaims, sign_token, verify_token};
pub use verify_otp::{VerifyOtpInput, VerifyOtpOutput, VerifyOtpUseCase};
