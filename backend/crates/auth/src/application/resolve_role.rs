//! Role Resolution
//!
//! Computes the effective role for an account at a point in time. An
//! admin grant wins over everything else; lapsed assistant grants are
//! evicted here, the first time anyone looks at them. This runs on
//! every protected request, so a revoked or expired grant takes
//! effect on the very next call regardless of what the bearer token
//! claims.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;
use crate::domain::repository::AdminGrantRepository;
use crate::domain::value_object::effective_role::EffectiveRole;
use crate::error::AuthResult;

/// Outcome of a role resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRole {
    pub role: EffectiveRole,
    /// Set only when the role comes from an assistant grant
    pub assistant_expires: Option<DateTime<Utc>>,
}

/// Resolves effective roles against the grant table
pub struct RoleResolver<G>
where
    G: AdminGrantRepository,
{
    grant_repo: Arc<G>,
}

impl<G> Clone for RoleResolver<G>
where
    G: AdminGrantRepository,
{
    fn clone(&self) -> Self {
        Self {
            grant_repo: Arc::clone(&self.grant_repo),
        }
    }
}

impl<G> RoleResolver<G>
where
    G: AdminGrantRepository,
{
    pub fn new(grant_repo: Arc<G>) -> Self {
        Self { grant_repo }
    }

    /// Effective role for `account` at `now`
    ///
    /// A live grant takes precedence over a suspension; the account
    /// stays banned for login purposes but authorization sees the
    /// admin tier.
    pub async fn role_for(&self, account: &Account, now: DateTime<Utc>) -> AuthResult<ResolvedRole> {
        if let Some(grant) = self.grant_repo.find_by_email(&account.email).await? {
            if grant.is_expired(now) {
                self.grant_repo.delete_by_email(&account.email).await?;
                tracing::info!(email = %account.email, "Expired assistant grant evicted");
            } else {
                return Ok(ResolvedRole {
                    role: EffectiveRole::from_grant(grant.role),
                    assistant_expires: grant.assistant_expires,
                });
            }
        }

        let role = if account.is_suspended(now) {
            EffectiveRole::Banned
        } else {
            EffectiveRole::User
        };

        Ok(ResolvedRole {
            role,
            assistant_expires: None,
        })
    }
}
