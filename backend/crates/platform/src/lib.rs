//! Platform Infrastructure
//!
//! Cross-cutting infrastructure shared by the domain crates:
//! - Cryptographic utilities (random codes, HMAC, hashing)
//! - Client identification (IP extraction behind proxies)
//! - Bearer token header handling
//! - Outbound mail delivery
//! - Rate limiting abstractions

pub mod bearer;
pub mod client;
pub mod crypto;
pub mod mailer;
pub mod rate_limit;
