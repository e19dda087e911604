//! Cryptographic Utilities

use rand::{Rng, rngs::OsRng};

/// Generate a uniformly random numeric code of `digits` digits
///
/// Leading zeros are preserved, so the result is always exactly
/// `digits` characters long. Used for one-time passcodes.
pub fn numeric_code(digits: u32) -> String {
    let upper = 10u64.pow(digits);
    let n: u64 = OsRng.gen_range(0..upper);
    format!("{:0width$}", n, width = digits as usize)
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
