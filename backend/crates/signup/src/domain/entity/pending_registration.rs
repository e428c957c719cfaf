//! Pending Registration Entity
//!
//! An unconfirmed signup waiting for its one-time code.

use platform::password::CredentialSecret;

use crate::domain::value_object::{
    author_category::AuthorCategory, email::Email, full_name::FullName, otp_code::OtpCode,
};

/// Validity window of every pending registration, in seconds
pub const PENDING_TTL_SECS: i64 = 600;

/// Unconfirmed signup
///
/// Owned by the pending store; the verification flow only reads copies.
/// Invariant: `expires_at == created_at + PENDING_TTL_SECS`.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    /// Email address, the store key
    pub identity: Email,
    pub full_name: FullName,
    /// Clear text until promoted into an account
    pub credential_secret: CredentialSecret,
    pub category: AuthorCategory,
    pub otp_code: OtpCode,
    /// Unix seconds, server clock
    pub created_at: i64,
    /// Unix seconds, `created_at + PENDING_TTL_SECS`
    pub expires_at: i64,
}

impl PendingRegistration {
    /// Build a record issued at `now` with a fresh window
    pub fn new(
        identity: Email,
        full_name: FullName,
        credential_secret: CredentialSecret,
        category: AuthorCategory,
        otp_code: OtpCode,
        now: i64,
    ) -> Self {
        Self {
            identity,
            full_name,
            credential_secret,
            category,
            otp_code,
            created_at: now,
            expires_at: now + PENDING_TTL_SECS,
        }
    }

    /// `now - created_at > PENDING_TTL_SECS`, whatever `expires_at` says.
    /// The last valid second is `created_at + PENDING_TTL_SECS`.
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now - self.created_at > PENDING_TTL_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(now: i64) -> PendingRegistration {
        PendingRegistration::new(
            Email::new("ada@example.com").unwrap(),
            FullName::new("Ada").unwrap(),
            CredentialSecret::new("x".to_string()).unwrap(),
            AuthorCategory::Primary,
            OtpCode::parse("123456").unwrap(),
            now,
        )
    }

    #[test]
    fn test_window_is_created_plus_ttl() {
        let record = sample(1_700_000_000);
        assert_eq!(record.expires_at - record.created_at, 600);
        assert_eq!(PENDING_TTL_SECS, 600);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = sample(1_000);
        assert!(!record.is_expired_at(1_000));
        assert!(!record.is_expired_at(1_600));
        assert!(record.is_expired_at(1_601));
    }

    #[test]
    fn test_stored_expiry_cannot_extend_window() {
        // A row written with a longer window still expires 600s after creation
        let mut record = sample(1_000);
        record.expires_at = record.created_at + 3_600;
        assert!(!record.is_expired_at(1_600));
        assert!(record.is_expired_at(1_601));
    }
}
