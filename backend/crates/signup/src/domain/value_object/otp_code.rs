//! One-Time Code Value Object

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use platform::crypto::{constant_time_eq, random_otp_digits};

/// Number of digits in a code
pub const OTP_LENGTH: usize = 6;

/// Six ASCII digits proving control of an email address
#[derive(Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct OtpCode(String);

impl OtpCode {
    /// Draw a fresh code, uniform over 100000..=999999
    pub fn generate() -> Self {
        Self(random_otp_digits().to_string())
    }

    /// Wrap a stored code, checking its shape
    pub fn parse(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        if raw.len() != OTP_LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::bad_request("Code must be exactly 6 digits"));
        }
        Ok(Self(raw))
    }

    /// Exact comparison against a submitted code. No trimming or other
    /// normalization is applied to `submitted`.
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), submitted.as_bytes())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode(******)")
    }
}
