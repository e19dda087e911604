//! Domain Entities
//!
//! Core business entities for the billing domain.

use chrono::{DateTime, Utc};

use auth::models::premium_tier::PremiumTier;
use kernel::id::{AccountId, TipId, TransactionId};

use crate::domain::value_objects::{ReviewStatus, TipCategory, TransactionKind};
use crate::error::{BillingError, BillingResult};

/// A manually reviewed payment claim
///
/// Append-only: rows are created Pending and reviewed exactly once.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub kind: TransactionKind,
    /// Meaningful only when kind is Premium
    pub premium_plan: Option<PremiumTier>,
    /// Amount in minor currency units
    pub amount: i64,
    /// Opaque payment-proof reference (stored file id or free text)
    pub proof: String,
    pub status: ReviewStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        account_id: AccountId,
        kind: TransactionKind,
        premium_plan: Option<PremiumTier>,
        amount: i64,
        proof: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: TransactionId::new(),
            account_id,
            kind,
            premium_plan,
            amount,
            proof,
            status: ReviewStatus::Pending,
            admin_notes: None,
            created_at: now,
            reviewed_at: None,
        }
    }

    /// Apply the single terminal transition
    pub fn review(
        &mut self,
        decision: ReviewStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> BillingResult<()> {
        if self.status.is_terminal() {
            return Err(BillingError::AlreadyReviewed);
        }
        if !decision.is_terminal() {
            return Err(BillingError::Validation(
                "Review decision must be approved or rejected".into(),
            ));
        }

        self.status = decision;
        self.admin_notes = notes;
        self.reviewed_at = Some(now);
        Ok(())
    }
}

/// An odds tip published by an admin
#[derive(Debug, Clone)]
pub struct Tip {
    pub tip_id: TipId,
    pub category: TipCategory,
    pub title: String,
    pub content: String,
    pub odds_value: f64,
    /// Price in minor currency units
    pub price: i64,
    pub is_active: bool,
    /// Category-wide kill switch
    pub category_enabled: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Tip {
    /// Whether account-side reads should see this tip
    pub fn is_visible(&self) -> bool {
        self.is_active && self.category_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    fn transaction() -> Transaction {
        Transaction::new(
            Id::new(),
            TransactionKind::Premium,
            Some(PremiumTier::Basic),
            500,
            "receipt-001".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_transaction_is_pending() {
        let tx = transaction();
        assert_eq!(tx.status, ReviewStatus::Pending);
        assert!(tx.admin_notes.is_none());
        assert!(tx.reviewed_at.is_none());
    }

    #[test]
    fn test_review_is_terminal() {
        let mut tx = transaction();
        let now = Utc::now();
        tx.review(ReviewStatus::Approved, None, now).unwrap();
        assert_eq!(tx.status, ReviewStatus::Approved);
        assert_eq!(tx.reviewed_at, Some(now));

        let again = tx.review(ReviewStatus::Rejected, None, now);
        assert!(matches!(again, Err(BillingError::AlreadyReviewed)));
        assert_eq!(tx.status, ReviewStatus::Approved);
    }

    #[test]
    fn test_review_rejects_pending_decision() {
        let mut tx = transaction();
        let result = tx.review(ReviewStatus::Pending, None, Utc::now());
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_rejection_keeps_notes() {
        let mut tx = transaction();
        tx.review(
            ReviewStatus::Rejected,
            Some("proof unreadable".to_string()),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(tx.admin_notes.as_deref(), Some("proof unreadable"));
    }

    #[test]
    fn test_tip_visibility() {
        let mut tip = Tip {
            tip_id: Id::new(),
            category: TipCategory::Aviator,
            title: "Evening rounds".to_string(),
            content: "2.1x within the first five rounds".to_string(),
            odds_value: 2.1,
            price: 200,
            is_active: true,
            category_enabled: true,
            created_by: "admin@example.com".to_string(),
            created_at: Utc::now(),
        };
        assert!(tip.is_visible());

        tip.category_enabled = false;
        assert!(!tip.is_visible());

        tip.category_enabled = true;
        tip.is_active = false;
        assert!(!tip.is_visible());
    }
}
