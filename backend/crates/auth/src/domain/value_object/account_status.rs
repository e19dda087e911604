//! Account base status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base account status, before any admin grant applies
///
/// Suspended accounts keep their ban reason and expiry on the
/// account record; both are cleared when the suspension is lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum AccountStatus {
    #[default]
    Active = 0,
    Suspended = 1,
}

impl AccountStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => AccountStatus::Active,
            1 => AccountStatus::Suspended,
            _ => {
                tracing::error!("Invalid AccountStatus id: {}", id);
                unreachable!("Invalid AccountStatus id: {}", id)
            }
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(AccountStatus::from_id(0), AccountStatus::Active);
        assert_eq!(AccountStatus::from_id(1), AccountStatus::Suspended);
        assert_eq!(AccountStatus::Active.id(), 0);
        assert_eq!(AccountStatus::Suspended.id(), 1);
    }

    #[test]
    fn test_default_is_active() {
        assert_eq!(AccountStatus::default(), AccountStatus::Active);
    }
}
