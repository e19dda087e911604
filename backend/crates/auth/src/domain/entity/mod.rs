//! Domain Entities

pub mod account;
pub mod admin_grant;
pub mod referral;
