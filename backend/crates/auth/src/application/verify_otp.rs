//! Verify OTP Use Case
//!
//! Checks a submitted passcode, enforces the mismatch limit, pays out
//! referral credit on an account's first successful verification and
//! signs a bearer token.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::resolve_role::RoleResolver;
use crate::application::token::sign_token;
use crate::domain::entity::account::{Account, OtpMismatch};
use crate::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use crate::domain::value_object::{effective_role::EffectiveRole, email::Email};
use crate::error::{AuthError, AuthResult};

/// Verify OTP input
pub struct VerifyOtpInput {
    pub email: String,
    pub otp: String,
}

/// Verify OTP output
pub struct VerifyOtpOutput {
    pub token: String,
    pub role: EffectiveRole,
    /// Set only when the role comes from an assistant grant
    pub assistant_expires: Option<chrono::DateTime<Utc>>,
    pub account: Account,
}

/// Verify OTP use case
pub struct VerifyOtpUseCase<A, R, G>
where
    A: AccountRepository,
    R: ReferralRepository,
    G: AdminGrantRepository,
{
    account_repo: Arc<A>,
    referral_repo: Arc<R>,
    resolver: RoleResolver<G>,
    config: Arc<AuthConfig>,
}

impl<A, R, G> VerifyOtpUseCase<A, R, G>
where
    A: AccountRepository,
    R: ReferralRepository,
    G: AdminGrantRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        referral_repo: Arc<R>,
        resolver: RoleResolver<G>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            account_repo,
            referral_repo,
            resolver,
            config,
        }
    }

    pub async fn execute(&self, input: VerifyOtpInput) -> AuthResult<VerifyOtpOutput> {
        let email =
            Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let now = Utc::now();

        let mut account = self
            .account_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if account.lift_suspension_if_expired(now) {
            self.account_repo.update(&account).await?;
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

        if account.otp_expired(now) {
            return Err(AuthError::OtpExpired);
        }

        if !account.otp_matches(&input.otp) {
            let outcome = account.record_otp_mismatch(
                self.config.otp_max_attempts,
                self.config.auto_ban_window,
                now,
            );
            self.account_repo.update(&account).await?;

            return match outcome {
                OtpMismatch::AttemptsLeft(attempts_remaining) => {
                    Err(AuthError::InvalidOtp { attempts_remaining })
                }
                OtpMismatch::Suspended => Err(AuthError::Suspended {
                    reason: Account::AUTO_BAN_REASON.to_string(),
                    expires_at: account.ban_expires,
                }),
            };
        }

        account.clear_otp(now);

        if !account.referral_verified && account.referred_by.is_some() {
            // Flag flips only after the credit lands, so a failed credit
            // is retried on the next verification.
            match self.credit_referrer(&account).await {
                Ok(()) => account.mark_referral_verified(now),
                Err(e) => {
                    tracing::warn!(error = %e, account_id = %account.account_id, "Referral credit failed");
                }
            }
        }

        self.account_repo.update(&account).await?;

        let resolved = self.resolver.role_for(&account, now).await?;
        let token = sign_token(
            &self.config.token_secret,
            &account.account_id,
            account.email.as_str(),
            resolved.role,
            self.config.token_ttl,
            now,
        )?;

        tracing::info!(account_id = %account.account_id, role = %resolved.role, "OTP verified");

        Ok(VerifyOtpOutput {
            token,
            role: resolved.role,
            assistant_expires: resolved.assistant_expires,
            account,
        })
    }

    /// Pay one point to the referrer on this account's first
    /// verification. The referral row is flipped to Verified first so
    /// a retry never double-credits.
    async fn credit_referrer(&self, account: &Account) -> AuthResult<()> {
        let Some(referrer_id) = account.referred_by else {
            return Ok(());
        };

        let Some(mut referral) = self.referral_repo.find_by_referred(&account.account_id).await?
        else {
            return Ok(());
        };
        if !referral.verify() {
            return Ok(());
        }
        self.referral_repo.update(&referral).await?;

        let Some(mut referrer) = self.account_repo.find_by_id(&referrer_id).await? else {
            return Ok(());
        };

        let now = Utc::now();
        let rewarded = referrer.credit_referral_point(
            self.config.referral_reward_threshold,
            self.config.referral_reward_tier,
            self.config.referral_reward_days,
            now,
        );
        self.account_repo.update(&referrer).await?;

        if rewarded {
            tracing::info!(
                referrer = %referrer.account_id,
                tier = %self.config.referral_reward_tier.code(),
                "Referral reward granted"
            );
        }

        Ok(())
    }
}
