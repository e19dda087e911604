//! Review Payment Use Case
//!
//! The single terminal transition of a transaction. Approving a
//! Premium payment grants or extends the account's subscription;
//! approving an odds purchase is fulfilled manually by the reviewer.

use std::sync::Arc;

use chrono::Utc;

use auth::domain::repository::AccountRepository;
use kernel::id::TransactionId;

use crate::domain::entities::Transaction;
use crate::domain::repository::TransactionRepository;
use crate::domain::value_objects::{ReviewStatus, TransactionKind};
use crate::error::{BillingError, BillingResult};

/// Review payment input
pub struct ReviewPaymentInput {
    pub transaction_id: TransactionId,
    /// Terminal decision, Approved or Rejected
    pub decision: ReviewStatus,
    pub notes: Option<String>,
}

/// Review payment use case
pub struct ReviewPaymentUseCase<T, A>
where
    T: TransactionRepository,
    A: AccountRepository,
{
    transaction_repo: Arc<T>,
    account_repo: Arc<A>,
}

impl<T, A> ReviewPaymentUseCase<T, A>
where
    T: TransactionRepository,
    A: AccountRepository,
{
    pub fn new(transaction_repo: Arc<T>, account_repo: Arc<A>) -> Self {
        Self {
            transaction_repo,
            account_repo,
        }
    }

    pub async fn execute(&self, input: ReviewPaymentInput) -> BillingResult<Transaction> {
        let mut transaction = self
            .transaction_repo
            .find_by_id(&input.transaction_id)
            .await?
            .ok_or(BillingError::TransactionNotFound)?;

        let mut account = self
            .account_repo
            .find_by_id(&transaction.account_id)
            .await?
            .ok_or(BillingError::AccountNotFound)?;

        let now = Utc::now();
        transaction.review(input.decision, input.notes, now)?;

        if input.decision == ReviewStatus::Approved {
            match (transaction.kind, transaction.premium_plan) {
                (TransactionKind::Premium, Some(plan)) => {
                    account.grant_premium(plan, plan.duration_days(), now);
                    self.account_repo.update(&account).await?;
                    tracing::info!(
                        account_id = %account.account_id,
                        plan = %plan,
                        expires = ?account.premium_expires,
                        "Premium subscription granted"
                    );
                }
                (TransactionKind::Premium, None) => {
                    return Err(BillingError::Internal(
                        "Premium transaction without a plan".into(),
                    ));
                }
                _ => {
                    // Odds, booking and live-session purchases are
                    // fulfilled manually by the reviewer.
                    tracing::info!(
                        transaction_id = %transaction.transaction_id,
                        kind = %transaction.kind,
                        "Approved purchase awaiting manual fulfilment"
                    );
                }
            }
        }

        self.transaction_repo.update(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction.transaction_id,
            status = %transaction.status,
            "Payment reviewed"
        );

        Ok(transaction)
    }
}
