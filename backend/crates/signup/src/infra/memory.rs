//! In-Memory Repository
//!
//! DashMap-backed pending store and account table. Each operation on one
//! identity runs under that key's shard lock, so a reader never sees a
//! half-written record. Used for tests and single-node development.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel::id::AccountId;
use platform::password::CredentialSecret;
use std::sync::Arc;

use crate::domain::entity::{
    account::{Account, NewAccount},
    pending_registration::PendingRegistration,
};
use crate::domain::repository::{AccountRepository, PendingRegistrationStore};
use crate::domain::value_object::{account_role::AccountRole, email::Email};
use crate::error::{SignupError, SignupResult};

/// Account as held by the in-memory table
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub account: Account,
    pub credential_secret: CredentialSecret,
    pub roles: Vec<AccountRole>,
}

/// In-memory repository; clones share the same tables
#[derive(Clone, Default)]
pub struct InMemorySignupRepository {
    pending: Arc<DashMap<String, PendingRegistration>>,
    accounts: Arc<DashMap<String, StoredAccount>>,
}

impl InMemorySignupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending registrations, expired ones included
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Snapshot of the stored account for `identity`
    pub fn stored_account(&self, identity: &str) -> Option<StoredAccount> {
        self.accounts.get(identity).map(|a| a.value().clone())
    }
}

impl PendingRegistrationStore for InMemorySignupRepository {
    async fn put(&self, registration: &PendingRegistration) -> SignupResult<()> {
        self.pending
            .insert(registration.identity.as_str().to_string(), registration.clone());
        Ok(())
    }

    async fn get(&self, identity: &Email) -> SignupResult<Option<PendingRegistration>> {
        Ok(self.pending.get(identity.as_str()).map(|r| r.value().clone()))
    }

    async fn delete(&self, identity: &Email) -> SignupResult<()> {
        self.pending.remove(identity.as_str());
        Ok(())
    }

    async fn purge_expired(&self, before: i64) -> SignupResult<u64> {
        let mut purged = 0u64;
        self.pending.retain(|_, r| {
            let keep = r.expires_at >= before;
            if !keep {
                purged += 1;
            }
            keep
        });
        Ok(purged)
    }
}

impl AccountRepository for InMemorySignupRepository {
    async fn find_by_identity(&self, identity: &Email) -> SignupResult<Option<Account>> {
        Ok(self
            .accounts
            .get(identity.as_str())
            .map(|a| a.account.clone()))
    }

    async fn create(&self, request: &NewAccount) -> SignupResult<Account> {
        match self.accounts.entry(request.identity.as_str().to_string()) {
            Entry::Occupied(_) => Err(SignupError::DuplicateAccount),
            Entry::Vacant(slot) => {
                let account = Account::new(request);
                slot.insert(StoredAccount {
                    account: account.clone(),
                    credential_secret: request.credential_secret.clone(),
                    roles: Vec::new(),
                });
                Ok(account)
            }
        }
    }

    async fn assign_role(&self, account_id: AccountId, role: AccountRole) -> SignupResult<()> {
        let mut stored = self
            .accounts
            .iter_mut()
            .find(|a| a.account.account_id == account_id)
            .ok_or_else(|| SignupError::Internal(format!("account {} not found", account_id)))?;
        if !stored.roles.contains(&role) {
            stored.roles.push(role);
        }
        Ok(())
    }
}
