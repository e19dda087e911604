//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;

// ============================================================================
// Request OTP
// ============================================================================

/// Request OTP request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpRequest {
    pub email: String,
    /// Referral code, honored only at first login
    pub referral_code: Option<String>,
}

/// Request OTP response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpResponse {
    pub message: String,
    pub registered: bool,
}

// ============================================================================
// Verify OTP
// ============================================================================

/// Verify OTP request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Verify OTP response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub token: String,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_expires_at_ms: Option<i64>,
}

// ============================================================================
// Account summary (shared by /me and admin views)
// ============================================================================

/// Account snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: String,
    pub email: String,
    pub status: String,
    pub premium_tier: String,
    pub premium_expires_at_ms: Option<i64>,
    pub referral_code: String,
    pub referral_points: i32,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub ban_expires_at_ms: Option<i64>,
}

impl AccountSummary {
    pub fn from_account(account: &Account, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            account_id: account.account_id.to_string(),
            email: account.email.as_str().to_string(),
            status: account.status.code().to_string(),
            premium_tier: account.premium_tier.code().to_string(),
            premium_expires_at_ms: account.premium_expires.map(|at| at.timestamp_millis()),
            referral_code: account.referral_code.as_str().to_string(),
            referral_points: account.referral_points,
            banned: account.is_suspended(now),
            ban_reason: account.ban_reason.clone(),
            ban_expires_at_ms: account.ban_expires.map(|at| at.timestamp_millis()),
        }
    }
}

// ============================================================================
// Admin management
// ============================================================================

/// Ban user request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanUserRequest {
    pub user_id: String,
    pub reason: String,
    pub duration_hours: i64,
}

/// Create assistant request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantRequest {
    pub email: String,
    pub duration_days: i64,
}

/// Create assistant response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantResponse {
    pub email: String,
    pub role: String,
    pub expires_at_ms: Option<i64>,
}
