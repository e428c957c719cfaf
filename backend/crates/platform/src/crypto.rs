//! Cryptographic Utilities

use rand::{Rng, rngs::OsRng};

/// Smallest six-digit code
pub const OTP_MIN: u32 = 100_000;
/// Largest six-digit code
pub const OTP_MAX: u32 = 999_999;

/// Draw a uniformly random six-digit number from the OS RNG
pub fn random_otp_digits() -> u32 {
    OsRng.gen_range(OTP_MIN..=OTP_MAX)
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
