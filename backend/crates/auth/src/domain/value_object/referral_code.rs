//! Referral code value object
//!
//! Every account owns a shareable code derived from its email local
//! part plus a base36 time suffix, which keeps codes human-readable
//! while avoiding collisions between accounts with the same local part.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Number of base36 timestamp characters appended to the local part
const SUFFIX_LEN: usize = 4;

/// An account's own referral code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Derive a code from the email local part and issuance time
    pub fn derive(local_part: &str, issued_at: DateTime<Utc>) -> Self {
        let sanitized: String = local_part
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let suffix = base36(issued_at.timestamp_millis() as u64);
        let tail = &suffix[suffix.len().saturating_sub(SUFFIX_LEN)..];

        Self(format!("{}{}", sanitized, tail))
    }

    /// Wrap a code loaded from storage
    pub fn from_string(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_derive_is_nonempty_and_prefixed() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let code = ReferralCode::derive("punter99", at);
        assert!(code.as_str().starts_with("punter99"));
        assert!(code.as_str().len() > "punter99".len());
    }

    #[test]
    fn test_derive_sanitizes_local_part() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let code = ReferralCode::derive("a.b-c+d", at);
        assert!(code.as_str().starts_with("abcd"));
    }

    #[test]
    fn test_same_local_part_different_times_differ() {
        let t1 = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 37).unwrap();
        let c1 = ReferralCode::derive("punter", t1);
        let c2 = ReferralCode::derive("punter", t2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
    }
}
