//! HTTP Handlers

use crate::application::config::SignupConfig;
use crate::application::identity_locks::IdentityLocks;
use crate::application::notifier::NotificationQueue;
use crate::application::request_registration::{RegistrationInput, RequestRegistrationUseCase};
use crate::application::verify_registration::{VerificationInput, VerifyRegistrationUseCase};
use crate::domain::repository::{AccountRepository, PendingRegistrationStore};
use crate::error::SignupResult;
use crate::presentation::dto::{RegisterRequest, RegisterResponse, VerifyRequest, VerifyResponse};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::StatusCode;
use platform::clock::Clock;
use std::sync::Arc;

/// Shared state for signup handlers
#[derive(Clone)]
pub struct SignupAppState<R>
where
    R: PendingRegistrationStore + AccountRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub queue: NotificationQueue,
    pub clock: Arc<dyn Clock>,
    pub locks: Arc<IdentityLocks>,
    pub config: Arc<SignupConfig>,
}

/// POST /register
pub async fn register<R>(
    State(state): State<SignupAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> SignupResult<impl IntoResponse>
where
    R: PendingRegistrationStore + AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = RequestRegistrationUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.queue.clone(),
        state.clock.clone(),
        state.locks.clone(),
        state.config.clone(),
    );

    let input = RegistrationInput {
        full_name: req.full_name,
        email: req.email,
        password: req.password,
        category: req.category,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RegisterResponse {
            verify_url: state.config.verify_url(output.identity.as_str()),
            identity: output.identity.to_string(),
            expires_at: output.expires_at,
            message: "A verification code has been sent to your email address",
        }),
    ))
}

/// POST /verify
pub async fn verify<R>(
    State(state): State<SignupAppState<R>>,
    Json(req): Json<VerifyRequest>,
) -> SignupResult<Json<VerifyResponse>>
where
    R: PendingRegistrationStore + AccountRepository + Clone + Send + Sync + 'static,
{
    let use_case = VerifyRegistrationUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.queue.clone(),
        state.clock.clone(),
        state.locks.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(VerificationInput {
            email: req.email,
            code: req.code,
        })
        .await?;

    Ok(Json(VerifyResponse {
        identity: output.identity.to_string(),
        status: "pending_approval",
        message: "Your email address is verified. Your account is awaiting approval.",
    }))
}
