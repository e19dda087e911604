//! Admin grant role tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tier carried by an admin grant
///
/// SuperAdmin is created once at bootstrap and never expires.
/// AssistantAdmin grants carry an expiry and are evicted lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum AdminRole {
    AssistantAdmin = 0,
    Admin = 1,
    SuperAdmin = 2,
}

impl AdminRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AdminRole::AssistantAdmin => "AssistantAdmin",
            AdminRole::Admin => "Admin",
            AdminRole::SuperAdmin => "SuperAdmin",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => AdminRole::AssistantAdmin,
            1 => AdminRole::Admin,
            2 => AdminRole::SuperAdmin,
            _ => {
                tracing::error!("Invalid AdminRole id: {}", id);
                unreachable!("Invalid AdminRole id: {}", id)
            }
        }
    }

    #[inline]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin)
    }

    /// Whether this tier may ban accounts (assistants may not)
    #[inline]
    pub const fn can_ban(&self) -> bool {
        matches!(self, AdminRole::Admin | AdminRole::SuperAdmin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for role in [
            AdminRole::AssistantAdmin,
            AdminRole::Admin,
            AdminRole::SuperAdmin,
        ] {
            assert_eq!(AdminRole::from_id(role.id()), role);
        }
    }

    #[test]
    fn test_permissions() {
        assert!(!AdminRole::AssistantAdmin.can_ban());
        assert!(AdminRole::Admin.can_ban());
        assert!(AdminRole::SuperAdmin.can_ban());
        assert!(AdminRole::SuperAdmin.is_super_admin());
        assert!(!AdminRole::Admin.is_super_admin());
    }
}
