//! Author Category Value Object
//!
//! Which kind of author the applicant asked to become. Decides the role
//! granted once the email address is verified.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_object::account_role::AccountRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorCategory {
    /// Regular blogger
    Primary,
    /// Guest blogger
    Secondary,
}

impl AuthorCategory {
    /// Parse a submitted category, case-insensitively.
    ///
    /// Accepts the canonical codes as well as the form labels
    /// (`blogger`, `guest`, `guest_blogger`).
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "primary" | "blogger" => Ok(AuthorCategory::Primary),
            "secondary" | "guest" | "guest_blogger" | "guest blogger" => {
                Ok(AuthorCategory::Secondary)
            }
            "" => Err(AppError::bad_request("Author type is required")),
            _ => Err(AppError::bad_request(
                "Author type must be either blogger or guest blogger",
            )),
        }
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AuthorCategory::Primary => "primary",
            AuthorCategory::Secondary => "secondary",
        }
    }

    /// Human-readable label used in the admin notification
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            AuthorCategory::Primary => "Blogger",
            AuthorCategory::Secondary => "Guest Blogger",
        }
    }

    #[inline]
    pub const fn role(&self) -> AccountRole {
        match self {
            AuthorCategory::Primary => AccountRole::Blogger,
            AuthorCategory::Secondary => AccountRole::GuestBlogger,
        }
    }

    /// Decode a stored code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "primary" => Some(AuthorCategory::Primary),
            "secondary" => Some(AuthorCategory::Secondary),
            _ => None,
        }
    }
}

impl FromStr for AuthorCategory {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        AuthorCategory::parse(s)
    }
}

impl fmt::Display for AuthorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
