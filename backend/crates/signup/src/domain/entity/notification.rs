//! Notification Entity
//!
//! A request for the mail dispatcher: which template, to whom, in which
//! locale, with which variables. Rendering the template is the dispatcher's
//! job.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::entity::pending_registration::{PENDING_TTL_SECS, PendingRegistration};

/// Logical mail templates used by the signup workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    /// To the applicant: the one-time code and its expiry notice
    Otp,
    /// To the site administrator: a new signup awaits approval
    AdminNotify,
    /// To the applicant: acknowledgment after verification
    Thanks,
}

impl NotificationTemplate {
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            NotificationTemplate::Otp => "otp",
            NotificationTemplate::AdminNotify => "admin_notify",
            NotificationTemplate::Thanks => "thanks",
        }
    }
}

impl fmt::Display for NotificationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub template: NotificationTemplate,
    pub recipient: String,
    pub locale_id: String,
    pub variables: BTreeMap<String, String>,
}

impl Notification {
    /// Code mail for the applicant
    pub fn otp(registration: &PendingRegistration, locale_id: &str) -> Self {
        let minutes = (PENDING_TTL_SECS + 59) / 60;
        Self {
            template: NotificationTemplate::Otp,
            recipient: registration.identity.to_string(),
            locale_id: locale_id.to_string(),
            variables: BTreeMap::from([
                ("otp".to_string(), registration.otp_code.to_string()),
                ("expires_in_minutes".to_string(), minutes.to_string()),
                ("expires_at".to_string(), registration.expires_at.to_string()),
            ]),
        }
    }

    /// Signup summary for the administrator
    pub fn admin_notify(
        registration: &PendingRegistration,
        admin_email: &str,
        locale_id: &str,
    ) -> Self {
        Self {
            template: NotificationTemplate::AdminNotify,
            recipient: admin_email.to_string(),
            locale_id: locale_id.to_string(),
            variables: BTreeMap::from([
                ("full_name".to_string(), registration.full_name.to_string()),
                ("email".to_string(), registration.identity.to_string()),
                (
                    "category".to_string(),
                    registration.category.label().to_string(),
                ),
            ]),
        }
    }

    /// Acknowledgment for the applicant
    pub fn thanks(registration: &PendingRegistration, locale_id: &str) -> Self {
        Self {
            template: NotificationTemplate::Thanks,
            recipient: registration.identity.to_string(),
            locale_id: locale_id.to_string(),
            variables: BTreeMap::from([(
                "full_name".to_string(),
                registration.full_name.to_string(),
            )]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        author_category::AuthorCategory, email::Email, full_name::FullName, otp_code::OtpCode,
    };
    use platform::password::CredentialSecret;

    fn registration() -> PendingRegistration {
        PendingRegistration::new(
            Email::new("ada@example.com").unwrap(),
            FullName::new("Ada").unwrap(),
            CredentialSecret::new("x".to_string()).unwrap(),
            AuthorCategory::Secondary,
            OtpCode::parse("654321").unwrap(),
            0,
        )
    }

    #[test]
    fn test_otp_notification() {
        let n = Notification::otp(&registration(), "en");
        assert_eq!(n.template.id(), "otp");
        assert_eq!(n.recipient, "ada@example.com");
        assert_eq!(n.variables["otp"], "654321");
        assert_eq!(n.variables["expires_in_minutes"], "10");
    }

    #[test]
    fn test_admin_notification() {
        let n = Notification::admin_notify(&registration(), "admin@example.com", "en");
        assert_eq!(n.template, NotificationTemplate::AdminNotify);
        assert_eq!(n.recipient, "admin@example.com");
        assert_eq!(n.variables["full_name"], "Ada");
        assert_eq!(n.variables["email"], "ada@example.com");
        assert_eq!(n.variables["category"], "Guest Blogger");
    }

    #[test]
    fn test_thanks_notification_has_no_code() {
        let n = Notification::thanks(&registration(), "fr");
        assert_eq!(n.template.id(), "thanks");
        assert_eq!(n.locale_id, "fr");
        assert!(!n.variables.contains_key("otp"));
    }
}
