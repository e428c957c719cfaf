//! Request Registration Use Case
//!
//! Validates a signup form, issues a one-time code and stores the pending
//! registration, replacing any earlier one for the same email address.

use std::sync::Arc;

use platform::clock::Clock;
use platform::password::CredentialSecret;

use crate::application::config::SignupConfig;
use crate::application::identity_locks::IdentityLocks;
use crate::application::notifier::NotificationQueue;
use crate::domain::entity::{
    notification::Notification, pending_registration::PendingRegistration,
};
use crate::domain::repository::{AccountRepository, PendingRegistrationStore};
use crate::domain::value_object::{
    author_category::AuthorCategory, email::Email, full_name::FullName, otp_code::OtpCode,
};
use crate::error::{FieldError, SignupError, SignupResult};

/// Registration input, as submitted
pub struct RegistrationInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub category: String,
}

/// Registration output
#[derive(Debug, Clone)]
pub struct RegistrationOutput {
    pub identity: Email,
    pub category: AuthorCategory,
    pub expires_at: i64,
}

/// Validated registration form
struct ValidForm {
    full_name: FullName,
    identity: Email,
    secret: CredentialSecret,
    category: AuthorCategory,
}

/// Request registration use case
pub struct RequestRegistrationUseCase<S, A>
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

impl<S, A> RequestRegistrationUseCase<S, A>
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

    pub async fn execute(&self, input: RegistrationInput) -> SignupResult<RegistrationOutput> {
        let form = validate(input)?;

        let _guard = self.locks.lock(&form.identity).await;

        if self
            .account_repo
            .find_by_identity(&form.identity)
            .await?
            .is_some()
        {
            tracing::info!(identity = %form.identity, "Registration for existing account rejected");
            return Err(SignupError::DuplicateAccount);
        }

        let registration = PendingRegistration::new(
            form.identity,
            form.full_name,
            form.secret,
            form.category,
            OtpCode::generate(),
            self.clock.now(),
        );

        self.store.put(&registration).await?;

        if let Err(e) = self
            .queue
            .enqueue(Notification::otp(&registration, &self.config.locale_id))
        {
            tracing::warn!(
                error = %e,
                identity = %registration.identity,
                "Failed to queue verification code mail"
            );
        }

        tracing::info!(
            identity = %registration.identity,
            category = %registration.category,
            expires_at = registration.expires_at,
            "Registration pending verification"
        );

        Ok(RegistrationOutput {
            identity: registration.identity,
            category: registration.category,
            expires_at: registration.expires_at,
        })
    }
}

/// Check every field before touching any collaborator, reporting all
/// failures at once
fn validate(input: RegistrationInput) -> SignupResult<ValidForm> {
    let mut errors = Vec::new();

    let full_name = FullName::new(input.full_name)
        .map_err(|e| errors.push(FieldError::new("fullName", e.message())))
        .ok();
    let identity = Email::new(input.email)
        .map_err(|e| errors.push(FieldError::new("email", e.message())))
        .ok();
    let secret = CredentialSecret::new(input.password)
        .map_err(|e| errors.push(FieldError::new("password", e.to_string())))
        .ok();
    let category = AuthorCategory::parse(&input.category)
        .map_err(|e| errors.push(FieldError::new("category", e.message())))
        .ok();

    match (full_name, identity, secret, category) {
        (Some(full_name), Some(identity), Some(secret), Some(category)) => Ok(ValidForm {
            full_name,
            identity,
            secret,
            category,
        }),
        _ => Err(SignupError::Validation(errors)),
    }
}
