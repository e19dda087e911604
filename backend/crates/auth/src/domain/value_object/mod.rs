//! Value Objects

pub mod account_status;
pub mod admin_role;
pub mod effective_role;
pub mod email;
pub mod premium_tier;
pub mod referral_code;
