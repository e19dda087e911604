//! Ban Account Use Case
//!
//! Admin-initiated suspension. Role enforcement happens in the
//! middleware; this use case only refuses to ban accounts that hold a
//! live admin grant themselves.

use std::sync::Arc;

use chrono::{Duration, Utc};
use kernel::id::AccountId;

use crate::domain::repository::{AccountRepository, AdminGrantRepository};
use crate::error::{AuthError, AuthResult};

/// Ban account input
pub struct BanAccountInput {
    pub account_id: AccountId,
    pub reason: String,
    pub duration_hours: i64,
}

/// Ban account use case
pub struct BanAccountUseCase<A, G>
where
    A: AccountRepository,
    G: AdminGrantRepository,
{
    account_repo: Arc<A>,
    grant_repo: Arc<G>,
}

impl<A, G> BanAccountUseCase<A, G>
where
    A: AccountRepository,
    G: AdminGrantRepository,
{
    pub fn new(account_repo: Arc<A>, grant_repo: Arc<G>) -> Self {
        Self {
            account_repo,
            grant_repo,
        }
    }

    pub async fn execute(&self, input: BanAccountInput) -> AuthResult<()> {
        if input.reason.trim().is_empty() {
            return Err(AuthError::Validation("Ban reason cannot be empty".into()));
        }
        if input.duration_hours <= 0 {
            return Err(AuthError::Validation(
                "Ban duration must be positive".into(),
            ));
        }

        let mut account = self
            .account_repo
            .find_by_id(&input.account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let now = Utc::now();
        if let Some(grant) = self.grant_repo.find_by_email(&account.email).await? {
            if !grant.is_expired(now) {
                return Err(AuthError::Forbidden);
            }
        }

        let until = now + Duration::hours(input.duration_hours);
        account.suspend(input.reason.trim(), until, now);
        self.account_repo.update(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            until = %until,
            "Account suspended by admin"
        );

        Ok(())
    }
}
