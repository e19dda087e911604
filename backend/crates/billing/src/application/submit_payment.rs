//! Submit Payment Use Case
//!
//! Accepts a payment claim from an account and stores it as a Pending
//! transaction for manual review. No gateway is involved; the proof
//! field is an opaque reference the reviewer inspects out of band.

use std::sync::Arc;

use chrono::Utc;

use auth::models::premium_tier::PremiumTier;
use kernel::id::AccountId;

use crate::domain::entities::Transaction;
use crate::domain::repository::TransactionRepository;
use crate::domain::value_objects::TransactionKind;
use crate::error::{BillingError, BillingResult};

/// Submit payment input
pub struct SubmitPaymentInput {
    pub account_id: AccountId,
    pub kind: String,
    /// Required when kind is "premium"
    pub plan: Option<String>,
    pub amount: i64,
    pub proof: String,
}

/// Submit payment use case
pub struct SubmitPaymentUseCase<T>
where
    T: TransactionRepository,
{
    transaction_repo: Arc<T>,
}

impl<T> SubmitPaymentUseCase<T>
where
    T: TransactionRepository,
{
    pub fn new(transaction_repo: Arc<T>) -> Self {
        Self { transaction_repo }
    }

    pub async fn execute(&self, input: SubmitPaymentInput) -> BillingResult<Transaction> {
        let kind = TransactionKind::from_code(&input.kind)
            .ok_or_else(|| BillingError::Validation(format!("Unknown payment kind: {}", input.kind)))?;

        if input.amount <= 0 {
            return Err(BillingError::Validation("Amount must be positive".into()));
        }
        if input.proof.trim().is_empty() {
            return Err(BillingError::Validation(
                "Payment proof is required".into(),
            ));
        }

        let premium_plan = match (kind, input.plan.as_deref()) {
            (TransactionKind::Premium, Some(plan)) => {
                let tier = PremiumTier::from_code(plan).filter(|t| !t.is_none()).ok_or_else(
                    || BillingError::Validation(format!("Unknown premium plan: {plan}")),
                )?;
                Some(tier)
            }
            (TransactionKind::Premium, None) => {
                return Err(BillingError::Validation(
                    "Premium payments must name a plan".into(),
                ));
            }
            _ => None,
        };

        let transaction = Transaction::new(
            input.account_id,
            kind,
            premium_plan,
            input.amount,
            input.proof.trim().to_string(),
            Utc::now(),
        );
        self.transaction_repo.create(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction.transaction_id,
            account_id = %transaction.account_id,
            kind = %transaction.kind,
            "Payment submitted for review"
        );

        Ok(transaction)
    }
}
