//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

use crate::domain::value_object::premium_tier::PremiumTier;

/// Re-export rate limit config from platform
pub use platform::rate_limit::RateLimitConfig;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC token signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Bearer token lifetime
    pub token_ttl: Duration,
    /// OTP code lifetime
    pub otp_ttl: Duration,
    /// Number of OTP digits
    pub otp_digits: u32,
    /// Mismatches allowed before an automatic ban
    pub otp_max_attempts: u16,
    /// Suspension window applied on the final mismatch
    pub auto_ban_window: Duration,
    /// Assistant admin grant lifetime in days
    pub assistant_grant_days: i64,
    /// Points needed to trigger the referral reward
    pub referral_reward_threshold: i32,
    /// Tier granted when the threshold is reached
    pub referral_reward_tier: PremiumTier,
    /// Reward duration in days
    pub referral_reward_days: i64,
    /// OTP request rate limiting
    pub rate_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_ttl: Duration::days(7),
            otp_ttl: Duration::minutes(5),
            otp_digits: 6,
            otp_max_attempts: 3,
            auto_ban_window: Duration::hours(5),
            assistant_grant_days: 30,
            referral_reward_threshold: 5,
            referral_reward_tier: PremiumTier::Basic,
            referral_reward_days: 7,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }
}
