//! Repository Traits
//!
//! Ports for the signup workflow. Implementations live in the infra layer.

use crate::domain::entity::{
    account::{Account, NewAccount},
    notification::Notification,
    pending_registration::PendingRegistration,
};
use crate::domain::value_object::{account_role::AccountRole, email::Email};
use crate::error::{DispatchError, SignupResult};
use kernel::id::AccountId;

/// Pending registration store
///
/// At most one record per identity. Operations on one key are atomic.
#[trait_variant::make(PendingRegistrationStore: Send)]
pub trait LocalPendingRegistrationStore {
    /// Insert or overwrite the record for `registration.identity`
    async fn put(&self, registration: &PendingRegistration) -> SignupResult<()>;

    /// Current record, expired or not
    async fn get(&self, identity: &Email) -> SignupResult<Option<PendingRegistration>>;

    /// Remove the record if present (idempotent)
    async fn delete(&self, identity: &Email) -> SignupResult<()>;

    /// Drop records whose `expires_at` is before `before`; returns the count
    async fn purge_expired(&self, before: i64) -> SignupResult<u64>;
}

/// Account repository (creation only)
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    async fn find_by_identity(&self, identity: &Email) -> SignupResult<Option<Account>>;

    /// Create an account. Fails if the identity is already taken.
    async fn create(&self, account: &NewAccount) -> SignupResult<Account>;

    async fn assign_role(&self, account_id: AccountId, role: AccountRole) -> SignupResult<()>;
}

/// Outbound mail
#[trait_variant::make(NotificationDispatcher: Send)]
pub trait LocalNotificationDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), DispatchError>;
}
