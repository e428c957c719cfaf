//! Account Entity
//!
//! The account materialized by a successful verification. This crate only
//! creates accounts; approval and activation happen elsewhere.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::CredentialSecret;

use crate::domain::entity::pending_registration::PendingRegistration;
use crate::domain::value_object::{email::Email, full_name::FullName};

/// Account creation request handed to the account repository
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub identity: Email,
    pub display_name: FullName,
    pub credential_secret: CredentialSecret,
    /// Always `false` from this workflow: new authors await approval
    pub active: bool,
}

impl NewAccount {
    /// Inactive account request built from a verified registration
    pub fn pending_approval(registration: &PendingRegistration) -> Self {
        Self {
            identity: registration.identity.clone(),
            display_name: registration.full_name.clone(),
            credential_secret: registration.credential_secret.clone(),
            active: false,
        }
    }
}

/// Created account as reported back by the repository
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub identity: Email,
    pub display_name: FullName,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(request: &NewAccount) -> Self {
        Self {
            account_id: AccountId::new(),
            identity: request.identity.clone(),
            display_name: request.display_name.clone(),
            is_active: request.active,
            created_at: Utc::now(),
        }
    }
}
