//! Premium subscription tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier
///
/// `None` means no active subscription; the account's premium expiry
/// is null exactly when the tier is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum PremiumTier {
    #[default]
    None = 0,
    Basic = 1,
    Standard = 2,
    Ultimate = 3,
}

impl PremiumTier {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            PremiumTier::None => "None",
            PremiumTier::Basic => "Basic",
            PremiumTier::Standard => "Standard",
            PremiumTier::Ultimate => "Ultimate",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "None" => Some(PremiumTier::None),
            "Basic" => Some(PremiumTier::Basic),
            "Standard" => Some(PremiumTier::Standard),
            "Ultimate" => Some(PremiumTier::Ultimate),
            _ => None,
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => PremiumTier::None,
            1 => PremiumTier::Basic,
            2 => PremiumTier::Standard,
            3 => PremiumTier::Ultimate,
            _ => {
                tracing::error!("Invalid PremiumTier id: {}", id);
                unreachable!("Invalid PremiumTier id: {}", id)
            }
        }
    }

    /// Paid duration granted per approved plan purchase
    #[inline]
    pub const fn duration_days(&self) -> i64 {
        match self {
            PremiumTier::None => 0,
            PremiumTier::Basic => 7,
            PremiumTier::Standard => 21,
            PremiumTier::Ultimate => 30,
        }
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, PremiumTier::None)
    }
}

impl fmt::Display for PremiumTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(PremiumTier::None.duration_days(), 0);
        assert_eq!(PremiumTier::Basic.duration_days(), 7);
        assert_eq!(PremiumTier::Standard.duration_days(), 21);
        assert_eq!(PremiumTier::Ultimate.duration_days(), 30);
    }

    #[test]
    fn test_roundtrips() {
        for tier in [
            PremiumTier::None,
            PremiumTier::Basic,
            PremiumTier::Standard,
            PremiumTier::Ultimate,
        ] {
            assert_eq!(PremiumTier::from_id(tier.id()), tier);
            assert_eq!(PremiumTier::from_code(tier.code()), Some(tier));
        }
        assert_eq!(PremiumTier::from_code("Gold"), None);
    }
}
