//! Effective role used for authorization
//!
//! Merges the account's base status with any admin grant. An admin
//! grant takes precedence over a base-level ban; the account is still
//! banned for login purposes, but authorization sees the admin tier.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::admin_role::AdminRole;

/// The role actually used for authorization decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectiveRole {
    User,
    Banned,
    AssistantAdmin,
    Admin,
    SuperAdmin,
}

impl EffectiveRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            EffectiveRole::User => "User",
            EffectiveRole::Banned => "Banned",
            EffectiveRole::AssistantAdmin => "AssistantAdmin",
            EffectiveRole::Admin => "Admin",
            EffectiveRole::SuperAdmin => "SuperAdmin",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "User" => Some(EffectiveRole::User),
            "Banned" => Some(EffectiveRole::Banned),
            "AssistantAdmin" => Some(EffectiveRole::AssistantAdmin),
            "Admin" => Some(EffectiveRole::Admin),
            "SuperAdmin" => Some(EffectiveRole::SuperAdmin),
            _ => None,
        }
    }

    /// Lift an admin grant tier into an effective role
    #[inline]
    pub const fn from_grant(role: AdminRole) -> Self {
        match role {
            AdminRole::AssistantAdmin => EffectiveRole::AssistantAdmin,
            AdminRole::Admin => EffectiveRole::Admin,
            AdminRole::SuperAdmin => EffectiveRole::SuperAdmin,
        }
    }

    /// Any admin tier, including assistants
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(
            self,
            EffectiveRole::AssistantAdmin | EffectiveRole::Admin | EffectiveRole::SuperAdmin
        )
    }

    /// Admin or SuperAdmin (assistants excluded)
    #[inline]
    pub const fn is_full_admin(&self) -> bool {
        matches!(self, EffectiveRole::Admin | EffectiveRole::SuperAdmin)
    }

    #[inline]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, EffectiveRole::SuperAdmin)
    }
}

impl fmt::Display for EffectiveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
