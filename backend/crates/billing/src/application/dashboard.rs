//! Dashboard Use Case
//!
//! Aggregates everything an account sees after login. This is also
//! where a lapsed subscription is actually downgraded; there is no
//! timer, the next dashboard read settles it.

use std::sync::Arc;

use chrono::Utc;

use auth::domain::entity::account::Account;
use auth::domain::entity::referral::ReferralListing;
use auth::domain::repository::{AccountRepository, ReferralRepository};

use crate::application::config::BillingConfig;
use crate::domain::entities::{Tip, Transaction};
use crate::domain::repository::{TipRepository, TransactionRepository};
use crate::error::BillingResult;

/// Dashboard output
pub struct DashboardOutput {
    /// Account state after lazy premium expiry
    pub account: Account,
    pub referrals: Vec<ReferralListing>,
    pub transactions: Vec<Transaction>,
    pub tips: Vec<Tip>,
    pub support_contact: String,
}

/// Dashboard use case
pub struct DashboardUseCase<A, R, T, P>
where
    A: AccountRepository,
    R: ReferralRepository,
    T: TransactionRepository,
    P: TipRepository,
{
    account_repo: Arc<A>,
    referral_repo: Arc<R>,
    transaction_repo: Arc<T>,
    tip_repo: Arc<P>,
    config: Arc<BillingConfig>,
}

impl<A, R, T, P> DashboardUseCase<A, R, T, P>
where
    A: AccountRepository,
    R: ReferralRepository,
    T: TransactionRepository,
    P: TipRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        referral_repo: Arc<R>,
        transaction_repo: Arc<T>,
        tip_repo: Arc<P>,
        config: Arc<BillingConfig>,
    ) -> Self {
        Self {
            account_repo,
            referral_repo,
            transaction_repo,
            tip_repo,
            config,
        }
    }

    pub async fn execute(&self, mut account: Account) -> BillingResult<DashboardOutput> {
        let now = Utc::now();
        if account.check_and_expire_premium(now) {
            self.account_repo.update(&account).await?;
            tracing::info!(account_id = %account.account_id, "Premium subscription lapsed");
        }

        let referrals = self.referral_repo.list_by_referrer(&account.account_id).await?;
        let transactions = self
            .transaction_repo
            .list_recent_for_account(&account.account_id, self.config.dashboard_transaction_limit)
            .await?;
        let tips = self.tip_repo.list_visible().await?;

        Ok(DashboardOutput {
            account,
            referrals,
            transactions,
            tips,
            support_contact: self.config.support_contact.clone(),
        })
    }
}
