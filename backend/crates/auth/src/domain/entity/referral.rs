//! Referral Entity
//!
//! A referral records a single referrer/referred pair, created at
//! registration time when the new account supplies a valid referral
//! code. It flips to Verified exactly once, on the referred account's
//! first successful OTP verification.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use kernel::id::AccountId;

/// Lifecycle of a referral pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralStatus {
    Pending,
    Verified,
}

impl ReferralStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Verified => "verified",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(ReferralStatus::Pending),
            "verified" => Some(ReferralStatus::Verified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Referral {
    pub referral_id: Uuid,
    pub referrer: AccountId,
    pub referred: AccountId,
    pub status: ReferralStatus,
    pub created_at: DateTime<Utc>,
}

impl Referral {
    pub fn new(referrer: AccountId, referred: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            referral_id: Uuid::new_v4(),
            referrer,
            referred,
            status: ReferralStatus::Pending,
            created_at: now,
        }
    }

    /// Marks the referral verified. Returns false if it already was,
    /// so the caller can skip the point credit.
    pub fn verify(&mut self) -> bool {
        if self.status == ReferralStatus::Verified {
            return false;
        }
        self.status = ReferralStatus::Verified;
        true
    }
}

/// A referral joined with the referred account's email, for listings
#[derive(Debug, Clone)]
pub struct ReferralListing {
    pub referral_id: Uuid,
    pub referred_email: String,
    pub status: ReferralStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    #[test]
    fn test_verify_is_one_shot() {
        let mut referral = Referral::new(Id::new(), Id::new(), Utc::now());
        assert_eq!(referral.status, ReferralStatus::Pending);
        assert!(referral.verify());
        assert!(!referral.verify());
        assert_eq!(referral.status, ReferralStatus::Verified);
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [ReferralStatus::Pending, ReferralStatus::Verified] {
            assert_eq!(ReferralStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ReferralStatus::from_code("unknown"), None);
    }
}
