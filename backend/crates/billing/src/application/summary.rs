//! Admin Summary Use Case

use std::sync::Arc;

use auth::domain::entity::admin_grant::AdminGrant;
use auth::domain::repository::{AccountRepository, AdminGrantRepository};

use crate::domain::repository::{TipRepository, TransactionRepository};
use crate::error::BillingResult;

/// Admin summary output
pub struct SummaryOutput {
    pub account_count: i64,
    pub pending_transaction_count: i64,
    pub active_tip_count: i64,
    pub grants: Vec<AdminGrant>,
}

/// Admin summary use case
pub struct SummaryUseCase<A, G, T, P>
where
    A: AccountRepository,
    G: AdminGrantRepository,
    T: TransactionRepository,
    P: TipRepository,
{
    account_repo: Arc<A>,
    grant_repo: Arc<G>,
    transaction_repo: Arc<T>,
    tip_repo: Arc<P>,
}

impl<A, G, T, P> SummaryUseCase<A, G, T, P>
where
    A: AccountRepository,
    G: AdminGrantRepository,
    T: TransactionRepository,
    P: TipRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        grant_repo: Arc<G>,
        transaction_repo: Arc<T>,
        tip_repo: Arc<P>,
    ) -> Self {
        Self {
            account_repo,
            grant_repo,
            transaction_repo,
            tip_repo,
        }
    }

    pub async fn execute(&self) -> BillingResult<SummaryOutput> {
        let account_count = self.account_repo.count().await?;
        let pending_transaction_count = self.transaction_repo.count_pending().await?;
        let active_tip_count = self.tip_repo.count_active().await?;
        let grants = self.grant_repo.list().await?;

        Ok(SummaryOutput {
            account_count,
            pending_transaction_count,
            active_tip_count,
            grants,
        })
    }
}
