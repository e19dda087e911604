//! Account Entity
//!
//! One record per email. Carries the OTP state machine, the
//! suspension (ban) fields, the premium subscription and the
//! referral bookkeeping.
//!
//! Invariants:
//! - ban reason/expiry are non-null iff status is Suspended
//! - premium expiry is non-null iff tier is not None
//! - `referral_verified`, once true, never reverts

use chrono::{DateTime, Duration, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{
    account_status::AccountStatus, email::Email, premium_tier::PremiumTier,
    referral_code::ReferralCode,
};

/// Outcome of a mismatched OTP submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMismatch {
    /// Still allowed to retry
    AttemptsLeft(u16),
    /// Attempt limit reached; the account is now suspended
    Suspended,
}

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub email: Email,
    pub status: AccountStatus,
    /// Why the account is suspended (set iff Suspended)
    pub ban_reason: Option<String>,
    /// When the suspension lifts (set iff Suspended)
    pub ban_expires: Option<DateTime<Utc>>,
    /// Pending one-time passcode, cleared on success or auto-ban
    pub otp_code: Option<String>,
    pub otp_expires: Option<DateTime<Utc>>,
    /// Mismatches since the last issuance
    pub otp_attempts: u16,
    pub premium_tier: PremiumTier,
    pub premium_expires: Option<DateTime<Utc>>,
    /// This account's own shareable code
    pub referral_code: ReferralCode,
    /// Who referred this account; set once at creation, immutable
    pub referred_by: Option<AccountId>,
    /// Points accumulated from verified referrals
    pub referral_points: i32,
    /// True once this account's first successful verification has
    /// credited its referrer
    pub referral_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Reason recorded when the OTP attempt limit suspends an account
    pub const AUTO_BAN_REASON: &'static str = "Too many failed OTP attempts";

    /// Create a new account
    ///
    /// The referral code is derived from the email local part and the
    /// creation time.
    pub fn new(email: Email, referred_by: Option<AccountId>, now: DateTime<Utc>) -> Self {
        let referral_code = ReferralCode::derive(email.local_part(), now);

        Self {
            account_id: AccountId::new(),
            email,
            status: AccountStatus::Active,
            ban_reason: None,
            ban_expires: None,
            otp_code: None,
            otp_expires: None,
            otp_attempts: 0,
            premium_tier: PremiumTier::None,
            premium_expires: None,
            referral_code,
            referred_by,
            referral_points: 0,
            referral_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    // ========================================================================
    // Ban policy
    // ========================================================================

    /// Whether the account is suspended at `now`
    pub fn is_suspended(&self, now: DateTime<Utc>) -> bool {
        self.status == AccountStatus::Suspended
            && self.ban_expires.is_some_and(|expires| now < expires)
    }

    /// Clear an expired suspension; no-op otherwise
    ///
    /// Returns true when the suspension was lifted. Called
    /// opportunistically on every OTP issuance and verification.
    pub fn lift_suspension_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == AccountStatus::Suspended
            && self.ban_expires.is_some_and(|expires| now >= expires)
        {
            self.status = AccountStatus::Active;
            self.ban_reason = None;
            self.ban_expires = None;
            self.updated_at = now;
            return true;
        }
        false
    }

    /// Suspend the account until `until`
    pub fn suspend(&mut self, reason: impl Into<String>, until: DateTime<Utc>, now: DateTime<Utc>) {
        self.status = AccountStatus::Suspended;
        self.ban_reason = Some(reason.into());
        self.ban_expires = Some(until);
        self.updated_at = now;
    }

    // ========================================================================
    // OTP state machine
    // ========================================================================

    /// Store a freshly issued code and reset the attempt counter
    pub fn issue_otp(&mut self, code: String, expires: DateTime<Utc>, now: DateTime<Utc>) {
        self.otp_code = Some(code);
        self.otp_expires = Some(expires);
        self.otp_attempts = 0;
        self.updated_at = now;
    }

    /// Whether the pending code (if any) has expired at `now`
    ///
    /// A missing code counts as expired: the previous code was
    /// consumed or never issued.
    pub fn otp_expired(&self, now: DateTime<Utc>) -> bool {
        match (&self.otp_code, self.otp_expires) {
            (Some(_), Some(expires)) => now > expires,
            _ => true,
        }
    }

    /// Compare a submitted code against the pending one
    pub fn otp_matches(&self, submitted: &str) -> bool {
        self.otp_code
            .as_deref()
            .is_some_and(|code| platform::crypto::constant_time_eq(code.as_bytes(), submitted.as_bytes()))
    }

    /// Record a mismatched submission
    ///
    /// On the `max_attempts`-th cumulative mismatch since the last
    /// issuance the account is suspended for `ban_window` and the
    /// pending code is cleared.
    pub fn record_otp_mismatch(
        &mut self,
        max_attempts: u16,
        ban_window: Duration,
        now: DateTime<Utc>,
    ) -> OtpMismatch {
        self.otp_attempts += 1;
        self.updated_at = now;

        if self.otp_attempts >= max_attempts {
            self.suspend(Self::AUTO_BAN_REASON, now + ban_window, now);
            self.clear_otp(now);
            return OtpMismatch::Suspended;
        }

        OtpMismatch::AttemptsLeft(max_attempts - self.otp_attempts)
    }

    /// Clear the pending code and attempt counter
    pub fn clear_otp(&mut self, now: DateTime<Utc>) {
        self.otp_code = None;
        self.otp_expires = None;
        self.otp_attempts = 0;
        self.updated_at = now;
    }

    // ========================================================================
    // Subscription lifecycle
    // ========================================================================

    /// Lazily downgrade an expired subscription
    ///
    /// Returns true when something changed and the account needs
    /// saving. Invoked on dashboard reads rather than a timer.
    pub fn check_and_expire_premium(&mut self, now: DateTime<Utc>) -> bool {
        if !self.premium_tier.is_none()
            && self.premium_expires.is_some_and(|expires| now > expires)
        {
            self.premium_tier = PremiumTier::None;
            self.premium_expires = None;
            self.updated_at = now;
            return true;
        }
        false
    }

    /// Set the tier and extend the expiry by `days`
    ///
    /// An already-active subscription extends from its current expiry
    /// rather than from now, so remaining paid time is never lost.
    pub fn grant_premium(&mut self, tier: PremiumTier, days: i64, now: DateTime<Utc>) {
        let start = match self.premium_expires {
            Some(current) if current > now => current,
            _ => now,
        };
        self.premium_tier = tier;
        self.premium_expires = Some(start + Duration::days(days));
        self.updated_at = now;
    }

    // ========================================================================
    // Referral bookkeeping
    // ========================================================================

    /// Mark this account's referral as verified (monotonic)
    pub fn mark_referral_verified(&mut self, now: DateTime<Utc>) {
        self.referral_verified = true;
        self.updated_at = now;
    }

    /// Credit one referral point to this account (as referrer)
    ///
    /// When the total reaches `threshold`, the threshold is deducted
    /// and a `reward_tier` subscription for `reward_days` is granted.
    /// Returns true when the reward fired.
    pub fn credit_referral_point(
        &mut self,
        threshold: i32,
        reward_tier: PremiumTier,
        reward_days: i64,
        now: DateTime<Utc>,
    ) -> bool {
        self.referral_points += 1;
        self.updated_at = now;

        if self.referral_points >= threshold {
            self.referral_points -= threshold;
            self.grant_premium(reward_tier, reward_days, now);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(
            Email::new("punter@example.com").unwrap(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_account_defaults() {
        let acc = account();
        assert_eq!(acc.status, AccountStatus::Active);
        assert_eq!(acc.premium_tier, PremiumTier::None);
        assert!(acc.premium_expires.is_none());
        assert_eq!(acc.otp_attempts, 0);
        assert!(!acc.referral_verified);
        assert!(!acc.referral_code.as_str().is_empty());
    }

    #[test]
    fn test_suspension_window() {
        let mut acc = account();
        let now = Utc::now();
        acc.suspend("manual ban", now + Duration::hours(2), now);
        assert!(acc.is_suspended(now));
        assert!(acc.is_suspended(now + Duration::hours(1)));
        assert!(!acc.is_suspended(now + Duration::hours(3)));
    }

    #[test]
    fn test_lift_suspension_if_expired() {
        let mut acc = account();
        let now = Utc::now();
        acc.suspend("manual ban", now + Duration::hours(1), now);

        // Not yet expired: nothing changes
        assert!(!acc.lift_suspension_if_expired(now));
        assert_eq!(acc.status, AccountStatus::Suspended);

        // Expired: fields are cleared together
        assert!(acc.lift_suspension_if_expired(now + Duration::hours(2)));
        assert_eq!(acc.status, AccountStatus::Active);
        assert!(acc.ban_reason.is_none());
        assert!(acc.ban_expires.is_none());
    }

    #[test]
    fn test_lift_suspension_is_idempotent() {
        let mut acc = account();
        let now = Utc::now();
        assert!(!acc.lift_suspension_if_expired(now));
        assert_eq!(acc.status, AccountStatus::Active);
        assert!(!acc.lift_suspension_if_expired(now));
    }

    #[test]
    fn test_otp_issue_and_match() {
        let mut acc = account();
        let now = Utc::now();
        acc.issue_otp("042137".to_string(), now + Duration::minutes(5), now);
        assert!(!acc.otp_expired(now));
        assert!(acc.otp_matches("042137"));
        assert!(!acc.otp_matches("042138"));
    }

    #[test]
    fn test_otp_expiry_includes_missing_code() {
        let mut acc = account();
        let now = Utc::now();
        assert!(acc.otp_expired(now));

        acc.issue_otp("111111".to_string(), now + Duration::minutes(5), now);
        assert!(acc.otp_expired(now + Duration::minutes(5) + Duration::seconds(1)));
    }

    #[test]
    fn test_otp_mismatch_counts_up_to_auto_ban() {
        let mut acc = account();
        let now = Utc::now();
        acc.issue_otp("123456".to_string(), now + Duration::minutes(5), now);

        assert_eq!(
            acc.record_otp_mismatch(3, Duration::hours(5), now),
            OtpMismatch::AttemptsLeft(2)
        );
        assert_eq!(
            acc.record_otp_mismatch(3, Duration::hours(5), now),
            OtpMismatch::AttemptsLeft(1)
        );
        assert_eq!(
            acc.record_otp_mismatch(3, Duration::hours(5), now),
            OtpMismatch::Suspended
        );

        assert!(acc.is_suspended(now));
        assert_eq!(acc.ban_reason.as_deref(), Some(Account::AUTO_BAN_REASON));
        assert_eq!(acc.ban_expires, Some(now + Duration::hours(5)));
        assert!(acc.otp_code.is_none());
        assert_eq!(acc.otp_attempts, 0);
    }

    #[test]
    fn test_attempts_survive_expiry_until_reissue() {
        let mut acc = account();
        let now = Utc::now();
        acc.issue_otp("123456".to_string(), now + Duration::minutes(5), now);
        acc.record_otp_mismatch(3, Duration::hours(5), now);
        acc.record_otp_mismatch(3, Duration::hours(5), now);
        assert_eq!(acc.otp_attempts, 2);

        // Expiry alone does not reset the counter
        assert!(acc.otp_expired(now + Duration::minutes(6)));
        assert_eq!(acc.otp_attempts, 2);

        // A fresh issuance does
        acc.issue_otp("654321".to_string(), now + Duration::minutes(11), now);
        assert_eq!(acc.otp_attempts, 0);
    }

    #[test]
    fn test_premium_lazy_expiry() {
        let mut acc = account();
        let now = Utc::now();
        acc.grant_premium(PremiumTier::Standard, 21, now);
        assert!(!acc.check_and_expire_premium(now + Duration::days(20)));
        assert_eq!(acc.premium_tier, PremiumTier::Standard);

        assert!(acc.check_and_expire_premium(now + Duration::days(22)));
        assert_eq!(acc.premium_tier, PremiumTier::None);
        assert!(acc.premium_expires.is_none());
    }

    #[test]
    fn test_grant_premium_extends_from_current_expiry() {
        let mut acc = account();
        let now = Utc::now();

        // Standard expiring in 10 days, then a Basic 7-day approval
        acc.premium_tier = PremiumTier::Standard;
        acc.premium_expires = Some(now + Duration::days(10));

        acc.grant_premium(PremiumTier::Basic, 7, now);
        assert_eq!(acc.premium_tier, PremiumTier::Basic);
        assert_eq!(acc.premium_expires, Some(now + Duration::days(17)));
    }

    #[test]
    fn test_grant_premium_from_none_starts_now() {
        let mut acc = account();
        let now = Utc::now();
        acc.grant_premium(PremiumTier::Ultimate, 30, now);
        assert_eq!(acc.premium_tier, PremiumTier::Ultimate);
        assert_eq!(acc.premium_expires, Some(now + Duration::days(30)));
    }

    #[test]
    fn test_grant_premium_past_expiry_starts_now() {
        let mut acc = account();
        let now = Utc::now();
        acc.premium_tier = PremiumTier::Basic;
        acc.premium_expires = Some(now - Duration::days(3));

        acc.grant_premium(PremiumTier::Basic, 7, now);
        assert_eq!(acc.premium_expires, Some(now + Duration::days(7)));
    }

    #[test]
    fn test_referral_reward_boundary() {
        let mut acc = account();
        let now = Utc::now();
        acc.referral_points = 4;

        let rewarded = acc.credit_referral_point(5, PremiumTier::Basic, 7, now);
        assert!(rewarded);
        assert_eq!(acc.referral_points, 0);
        assert_eq!(acc.premium_tier, PremiumTier::Basic);
        assert_eq!(acc.premium_expires, Some(now + Duration::days(7)));
    }

    #[test]
    fn test_referral_point_below_threshold() {
        let mut acc = account();
        let now = Utc::now();

        let rewarded = acc.credit_referral_point(5, PremiumTier::Basic, 7, now);
        assert!(!rewarded);
        assert_eq!(acc.referral_points, 1);
        assert_eq!(acc.premium_tier, PremiumTier::None);
    }
}
