//! Verify Registration Use Case
//!
//! Checks a submitted code against the pending registration and, on
//! success, turns it into an inactive account exactly once.

use std::sync::Arc;

use kernel::id::AccountId;
use platform::clock::Clock;

use crate::application::config::SignupConfig;
use crate::application::identity_locks::IdentityLocks;
use crate::application::notifier::NotificationQueue;
use crate::domain::entity::{account::NewAccount, notification::Notification};
use crate::domain::repository::{AccountRepository, PendingRegistrationStore};
use crate::domain::value_object::{account_role::AccountRole, email::Email};
use crate::error::{SignupError, SignupResult};

/// Verification input
pub struct VerificationInput {
    pub email: String,
    /// Compared verbatim; no trimming
    pub code: String,
}

/// Verification output
#[derive(Debug, Clone)]
pub struct VerificationOutput {
    pub identity: Email,
    pub account_id: AccountId,
    pub role: AccountRole,
}

/// Verify registration use case
pub struct VerifyRegistrationUseCase<S, A>
where
    S: PendingRegistrationStore,
    A: AccountRepository,
{
    store: Arc<S>,
    account_repo: Arc<A>,
    queue: NotificationQueue,
    clock: Arc<dyn Clock>,
    locks: Arc<IdentityLocks>,
    config: Arc<SignupConfig>,
}

impl<S, A> VerifyRegistrationUseCase<S, A>
where
    S: PendingRegistrationStore,
    A: AccountRepository,
{
    pub fn new(
        store: Arc<S>,
        account_repo: Arc<A>,
        queue: NotificationQueue,
        clock: Arc<dyn Clock>,
        locks: Arc<IdentityLocks>,
        config: Arc<SignupConfig>,
    ) -> Self {
        Self {
            store,
            account_repo,
            queue,
            clock,
            locks,
            config,
        }
    }

    pub async fn execute(&self, input: VerificationInput) -> SignupResult<VerificationOutput> {
        let identity =
            Email::new(input.email).map_err(|e| SignupError::invalid("email", e.message()))?;
        if input.code.is_empty() {
            return Err(SignupError::invalid("code", "Verification code is required"));
        }

        let _guard = self.locks.lock(&identity).await;

        let Some(registration) = self.store.get(&identity).await? else {
            tracing::debug!(identity = %identity, "Verification without pending registration");
            return Err(SignupError::PendingNotFound);
        };

        // Both checks run; expiry wins when both fail
        let now = self.clock.now();
        let expired = registration.is_expired_at(now);
        let code_matches = registration.otp_code.matches(&input.code);

        if expired {
            tracing::info!(
                identity = %identity,
                age_secs = now - registration.created_at,
                code_matches,
                "Verification code expired"
            );
            return Err(SignupError::CodeExpired);
        }
        if !code_matches {
            tracing::info!(identity = %identity, "Verification code mismatch");
            return Err(SignupError::CodeMismatch);
        }

        // Account first: a failure here must leave the pending record in place
        let account = self
            .account_repo
            .create(&NewAccount::pending_approval(&registration))
            .await
            .map_err(|e| SignupError::AccountCreation(e.to_string()))?;

        let role = registration.category.role();
        if let Err(e) = self.account_repo.assign_role(account.account_id, role).await {
            tracing::error!(
                error = %e,
                identity = %identity,
                account_id = %account.account_id,
                role = %role,
                "Role assignment failed for new account"
            );
        }

        for notification in [
            Notification::admin_notify(
                &registration,
                &self.config.admin_email,
                &self.config.locale_id,
            ),
            Notification::thanks(&registration, &self.config.locale_id),
        ] {
            let template = notification.template;
            if let Err(e) = self.queue.enqueue(notification) {
                tracing::warn!(
                    error = %e,
                    identity = %identity,
                    template = %template,
                    "Failed to queue notification"
                );
            }
        }

        if let Err(e) = self.store.delete(&identity).await {
            tracing::error!(
                error = %e,
                identity = %identity,
                "Account created but pending registration could not be removed"
            );
        }

        tracing::info!(
            identity = %identity,
            account_id = %account.account_id,
            role = %role,
            "Registration verified, account awaiting approval"
        );

        Ok(VerificationOutput {
            identity,
            account_id: account.account_id,
            role,
        })
    }
}
