use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted to an account created by the signup workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AccountRole {
    Blogger = 0,
    GuestBlogger = 1,
}

impl AccountRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccountRole::*;
        match self {
            Blogger => "blogger",
            GuestBlogger => "guest_blogger",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
