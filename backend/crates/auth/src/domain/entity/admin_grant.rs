//! Admin Grant Entity
//!
//! At most one grant per email. The email is a foreign reference to
//! an account, not an ownership relation: a grant may exist before
//! its account ever logs in.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{admin_role::AdminRole, email::Email};

/// An admin grant attached to an email
#[derive(Debug, Clone)]
pub struct AdminGrant {
    pub email: Email,
    pub role: AdminRole,
    /// Present only for AssistantAdmin grants
    pub assistant_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AdminGrant {
    /// The bootstrap grant; never expires
    pub fn super_admin(email: Email, now: DateTime<Utc>) -> Self {
        Self {
            email,
            role: AdminRole::SuperAdmin,
            assistant_expires: None,
            created_at: now,
        }
    }

    /// A full admin grant; never expires
    pub fn admin(email: Email, now: DateTime<Utc>) -> Self {
        Self {
            email,
            role: AdminRole::Admin,
            assistant_expires: None,
            created_at: now,
        }
    }

    /// A time-limited assistant grant
    pub fn assistant(email: Email, duration_days: i64, now: DateTime<Utc>) -> Self {
        Self {
            email,
            role: AdminRole::AssistantAdmin,
            assistant_expires: Some(now + Duration::days(duration_days)),
            created_at: now,
        }
    }

    /// Whether an assistant grant has lapsed
    ///
    /// Non-assistant grants never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (self.role, self.assistant_expires) {
            (AdminRole::AssistantAdmin, Some(expires)) => now > expires,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::new("staff@example.com").unwrap()
    }

    #[test]
    fn test_super_admin_never_expires() {
        let now = Utc::now();
        let grant = AdminGrant::super_admin(email(), now);
        assert!(grant.assistant_expires.is_none());
        assert!(!grant.is_expired(now + Duration::days(10_000)));
    }

    #[test]
    fn test_assistant_expiry() {
        let now = Utc::now();
        let grant = AdminGrant::assistant(email(), 14, now);
        assert_eq!(grant.role, AdminRole::AssistantAdmin);
        assert!(!grant.is_expired(now + Duration::days(13)));
        assert!(grant.is_expired(now + Duration::days(15)));
    }
}
