//! Request OTP Use Case
//!
//! Finds or registers the account for an email, issues a fresh
//! one-time passcode and mails it. Registration happens implicitly on
//! the first request; an optional referral code links the new account
//! to its referrer.

use std::sync::Arc;

use chrono::Utc;
use platform::mailer::{MailMessage, Mailer};
use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::entity::referral::Referral;
use crate::domain::repository::{AccountRepository, ReferralRepository};
use crate::domain::value_object::{email::Email, referral_code::ReferralCode};
use crate::error::{AuthError, AuthResult};

/// Request OTP input
pub struct RequestOtpInput {
    pub email: String,
    /// Referral code supplied at first login, ignored afterwards
    pub referral_code: Option<String>,
    /// Rate limiting key, usually the client IP
    pub client_key: String,
}

/// Request OTP output
pub struct RequestOtpOutput {
    /// Whether this request registered a new account
    pub registered: bool,
}

/// Request OTP use case
pub struct RequestOtpUseCase<A, R, M, L>
where
    A: AccountRepository,
    R: ReferralRepository,
    M: Mailer,
    L: RateLimitStore,
{
    account_repo: Arc<A>,
    referral_repo: Arc<R>,
    mailer: Arc<M>,
    rate_limiter: Arc<L>,
    config: Arc<AuthConfig>,
}

impl<A, R, M, L> RequestOtpUseCase<A, R, M, L>
where
    A: AccountRepository,
    R: ReferralRepository,
    M: Mailer,
    L: RateLimitStore,
{
    pub fn new(
        account_repo: Arc<A>,
        referral_repo: Arc<R>,
        mailer: Arc<M>,
        rate_limiter: Arc<L>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            account_repo,
            referral_repo,
            mailer,
            rate_limiter,
            config,
        }
    }

    pub async fn execute(&self, input: RequestOtpInput) -> AuthResult<RequestOtpOutput> {
        let outcome = self
            .rate_limiter
            .check_and_increment(&input.client_key, &self.config.rate_limit)
            .await
            .map_err(|e| AuthError::Internal(format!("rate limiter: {e}")))?;
        if !outcome.allowed {
            return Err(AuthError::RateLimited);
        }

        let email =
            Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let now = Utc::now();

        let (mut account, registered) = match self.account_repo.find_by_email(&email).await? {
            Some(account) => (account, false),
            None => {
                let account = self.register(email, input.referral_code.as_deref()).await?;
                (account, true)
            }
        };

        if account.lift_suspension_if_expired(now) {
            tracing::info!(account_id = %account.account_id, "Suspension lifted");
        }
        if account.is_suspended(now) {
            return Err(AuthError::Suspended {
                reason: account
                    .ban_reason
                    .clone()
                    .unwrap_or_else(|| "Account suspended".to_string()),
                expires_at: account.ban_expires,
            });
        }

        let code = platform::crypto::numeric_code(self.config.otp_digits);
        account.issue_otp(code.clone(), now + self.config.otp_ttl, now);
        self.account_repo.update(&account).await?;

        self.mailer
            .send(MailMessage {
                to: account.email.as_str().to_string(),
                subject: "Your login code".to_string(),
                body: format!(
                    "Your one-time passcode is {code}. It expires in {} minutes.",
                    self.config.otp_ttl.num_minutes()
                ),
            })
            .await?;

        tracing::info!(account_id = %account.account_id, registered, "OTP issued");

        Ok(RequestOtpOutput { registered })
    }

    /// Create a fresh account, linking the referrer when the supplied
    /// code resolves. An unknown code is ignored rather than rejected.
    async fn register(&self, email: Email, referral_code: Option<&str>) -> AuthResult<Account> {
        let now = Utc::now();

        let referrer = match referral_code {
            Some(raw) if !raw.trim().is_empty() => {
                let code = ReferralCode::from_string(raw.trim().to_string());
                self.account_repo.find_by_referral_code(&code).await?
            }
            _ => None,
        };

        let account = Account::new(email, referrer.as_ref().map(|r| r.account_id), now);
        self.account_repo.create(&account).await?;

        if let Some(referrer) = referrer {
            if referrer.account_id == account.account_id {
                return Ok(account);
            }
            let referral = Referral::new(referrer.account_id, account.account_id, now);
            // Best effort: a missing referral row only costs the
            // referrer a point, registration itself must not fail.
            if let Err(e) = self.referral_repo.create(&referral).await {
                tracing::warn!(error = %e, referrer = %referrer.account_id, "Failed to record referral");
            }
        }

        Ok(account)
    }
}
