//! Application Configuration
//!
//! Configuration for the signup application layer.

use std::time::Duration;
use url::form_urlencoded;

/// Signup application configuration
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// Recipient of the `admin_notify` mail
    pub admin_email: String,
    /// Locale passed to the mail dispatcher
    pub locale_id: String,
    /// Bounded capacity of the notification queue
    pub notification_queue_capacity: usize,
    /// How long an expired record is kept before passive purge
    pub pending_retention: Duration,
    /// Where the client submits the code, returned after registration
    pub verify_path: String,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@localhost".to_string(),
            locale_id: "en".to_string(),
            notification_queue_capacity: 64,
            pending_retention: Duration::from_secs(24 * 60 * 60),
            verify_path: "/verify".to_string(),
        }
    }
}

impl SignupConfig {
    /// Create config for development (small queue, short retention)
    pub fn development() -> Self {
        Self {
            notification_queue_capacity: 16,
            pending_retention: Duration::from_secs(60 * 60),
            ..Default::default()
        }
    }

    pub fn pending_retention_secs(&self) -> i64 {
        self.pending_retention.as_secs() as i64
    }

    /// Link to the verification step for `identity`
    pub fn verify_url(&self, identity: &str) -> String {
        let email: String = form_urlencoded::byte_serialize(identity.as_bytes()).collect();
        format!("{}?email={}", self.verify_path, email)
    }
}
