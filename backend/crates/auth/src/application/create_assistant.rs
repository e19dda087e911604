//! Create Assistant Use Case
//!
//! SuperAdmin-only issuance of time-limited AssistantAdmin grants.
//! One grant per email; an existing grant is a conflict, not an
//! overwrite.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::admin_grant::AdminGrant;
use crate::domain::repository::AdminGrantRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Create assistant input
pub struct CreateAssistantInput {
    pub email: String,
    pub duration_days: i64,
}

/// Create assistant use case
pub struct CreateAssistantUseCase<G>
where
    G: AdminGrantRepository,
{
    grant_repo: Arc<G>,
}

impl<G> CreateAssistantUseCase<G>
where
    G: AdminGrantRepository,
{
    pub fn new(grant_repo: Arc<G>) -> Self {
        Self { grant_repo }
    }

    pub async fn execute(&self, input: CreateAssistantInput) -> AuthResult<AdminGrant> {
        let email =
            Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.duration_days <= 0 {
            return Err(AuthError::Validation(
                "Grant duration must be positive".into(),
            ));
        }

        let now = Utc::now();
        if let Some(existing) = self.grant_repo.find_by_email(&email).await? {
            if existing.is_expired(now) {
                self.grant_repo.delete_by_email(&email).await?;
            } else {
                return Err(AuthError::Conflict(format!(
                    "An admin grant already exists for {email}"
                )));
            }
        }

        let grant = AdminGrant::assistant(email, input.duration_days, now);
        self.grant_repo.upsert(&grant).await?;

        tracing::info!(
            email = %grant.email,
            expires = ?grant.assistant_expires,
            "Assistant grant created"
        );

        Ok(grant)
    }
}
