//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use auth::models::AccountSummary;
use auth::models::admin_grant::AdminGrant;
use auth::models::referral::ReferralListing;

use crate::application::config::Plan;
use crate::domain::entities::{Tip, Transaction};

// ============================================================================
// Dashboard
// ============================================================================

/// Transaction as shown to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub transaction_id: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    pub amount: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub created_at_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at_ms: Option<i64>,
}

impl TransactionView {
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            transaction_id: transaction.transaction_id.to_string(),
            kind: transaction.kind.code().to_string(),
            plan: transaction.premium_plan.map(|p| p.code().to_string()),
            amount: transaction.amount,
            status: transaction.status.code().to_string(),
            admin_notes: transaction.admin_notes.clone(),
            created_at_ms: transaction.created_at.timestamp_millis(),
            reviewed_at_ms: transaction.reviewed_at.map(|at| at.timestamp_millis()),
        }
    }
}

/// Tip as shown to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TipView {
    pub tip_id: String,
    pub category: String,
    pub title: String,
    pub content: String,
    pub odds_value: f64,
    pub price: i64,
    pub created_at_ms: i64,
}

impl TipView {
    pub fn from_tip(tip: &Tip) -> Self {
        Self {
            tip_id: tip.tip_id.to_string(),
            category: tip.category.code().to_string(),
            title: tip.title.clone(),
            content: tip.content.clone(),
            odds_value: tip.odds_value,
            price: tip.price,
            created_at_ms: tip.created_at.timestamp_millis(),
        }
    }
}

/// Referral row as shown on the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralView {
    pub referred_email: String,
    pub status: String,
    pub created_at_ms: i64,
}

impl ReferralView {
    pub fn from_listing(listing: &ReferralListing) -> Self {
        Self {
            referred_email: listing.referred_email.clone(),
            status: listing.status.code().to_string(),
            created_at_ms: listing.created_at.timestamp_millis(),
        }
    }
}

/// GET /api/user/dashboard response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub account: AccountSummary,
    pub referrals: Vec<ReferralView>,
    pub transactions: Vec<TransactionView>,
    pub tips: Vec<TipView>,
    pub support_contact: String,
}

// ============================================================================
// Payment submission
// ============================================================================

/// POST /api/payment/submit request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentRequest {
    pub kind: String,
    /// Required when kind is "premium"
    pub plan: Option<String>,
    pub amount: i64,
    pub proof: String,
}

/// POST /api/payment/submit response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentResponse {
    pub transaction_id: String,
    pub status: String,
    pub message: String,
}

// ============================================================================
// Premium plans
// ============================================================================

/// GET /api/premium/plans response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansResponse {
    pub plans: Vec<Plan>,
}

// ============================================================================
// Admin review
// ============================================================================

/// POST /api/admin/verify-payment/{id} request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    /// "approved" or "rejected"
    pub status: String,
    pub admin_notes: Option<String>,
}

/// GET /api/admin/payments response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPaymentsResponse {
    pub payments: Vec<TransactionView>,
}

// ============================================================================
// Admin summary
// ============================================================================

/// Admin grant as shown in the summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantView {
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

impl GrantView {
    pub fn from_grant(grant: &AdminGrant) -> Self {
        Self {
            email: grant.email.as_str().to_string(),
            role: grant.role.code().to_string(),
            expires_at_ms: grant.assistant_expires.map(|at| at.timestamp_millis()),
        }
    }
}

/// GET /api/admin/summary response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub account_count: i64,
    pub pending_transaction_count: i64,
    pub active_tip_count: i64,
    pub admins: Vec<GrantView>,
}
