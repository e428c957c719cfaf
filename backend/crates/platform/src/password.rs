//! Credential Secret Hashing
//!
//! Handling of the password material an applicant submits at signup:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of the clear text on drop
//! - Optional application-wide pepper
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - The clear text lives only while a registration is pending; it is hashed
//!   when the account is materialized

use std::fmt;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Upper bound on secret length, keeps Argon2 input bounded
pub const MAX_SECRET_LENGTH: usize = 1024;

// ============================================================================
// Error Types
// ============================================================================

/// Secret policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretPolicyError {
    /// Secret is empty or whitespace only
    #[error("Password cannot be empty")]
    Empty,

    /// Secret is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Secret hashing errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Clear text secret (zeroized on drop)
// ============================================================================

/// Clear text credential secret with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`; every clone is wiped too
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::CredentialSecret;
///
/// let secret = CredentialSecret::new("correct horse".to_string()).unwrap();
/// let hashed = secret.hash(None).unwrap();
/// assert!(hashed.as_phc_string().starts_with("$argon2id$"));
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CredentialSecret(String);

impl CredentialSecret {
    /// Validate and wrap a submitted secret
    ///
    /// Rejects empty or whitespace-only input and anything longer than
    /// [`MAX_SECRET_LENGTH`] code points. Unicode is NFKC-normalized first.
    ///
    /// ## Arguments
    /// * `raw` - Secret as submitted; wiped before returning
    ///
    /// ## Returns
    /// The normalized secret, or the policy it violates
    pub fn new(raw: String) -> Result<Self, SecretPolicyError> {
        let normalized: String = raw.nfkc().collect();
        let mut raw = raw;
        raw.zeroize();

        if normalized.trim().is_empty() {
            return Err(SecretPolicyError::Empty);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_SECRET_LENGTH {
            return Err(SecretPolicyError::TooLong {
                max: MAX_SECRET_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(normalized))
    }

    /// Borrow the clear text, e.g. to persist a pending registration
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the secret using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedSecret`
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedSecret, SecretHashError> {
        let mut input = self.peppered(pepper);
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters:
        // m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&input, &salt)
            .map(|h| h.to_string())
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()));
        input.zeroize();

        Ok(HashedSecret { hash: result? })
    }
}

impl fmt::Debug for CredentialSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CredentialSecret")
            .field(&"[REDACTED]")
            .finish()
    }
}

impl PartialEq for CredentialSecret {
    fn eq(&self, other: &Self) -> bool {
        crate::crypto::constant_time_eq(self.0.as_bytes(), other.0.as_bytes())
    }
}

impl Eq for CredentialSecret {}

// ============================================================================
// Hashed secret (safe to store)
// ============================================================================

/// Hashed secret in PHC string format
///
/// The PHC string carries the algorithm identifier, version, parameters
/// (memory, iterations, parallelism), salt and hash.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret {
    hash: String,
}

impl HashedSecret {
    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedSecret")
            .field("hash", &"[HASH]")
            .finish()
    }
}
