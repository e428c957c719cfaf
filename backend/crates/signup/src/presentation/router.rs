//! Signup Router

use crate::application::config::SignupConfig;
use crate::application::identity_locks::IdentityLocks;
use crate::application::notifier::NotificationQueue;
use crate::domain::repository::{AccountRepository, PendingRegistrationStore};
use crate::infra::postgres::PgSignupRepository;
use crate::presentation::handlers::{self, SignupAppState};
use axum::{Router, routing::post};
use platform::clock::Clock;
use std::sync::Arc;

/// Create the signup router with PostgreSQL repository
pub fn signup_router(
    repo: PgSignupRepository,
    queue: NotificationQueue,
    clock: Arc<dyn Clock>,
    config: SignupConfig,
) -> Router {
    signup_router_generic(repo, queue, clock, config)
}

/// Create a generic signup router for any repository implementation
pub fn signup_router_generic<R>(
    repo: R,
    queue: NotificationQueue,
    clock: Arc<dyn Clock>,
    config: SignupConfig,
) -> Router
where
    R: PendingRegistrationStore + AccountRepository + Clone + Send + Sync + 'static,
{
    let state = SignupAppState {
        repo: Arc::new(repo),
        queue,
        clock,
        locks: Arc::new(IdentityLocks::new()),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/verify", post(handlers::verify::<R>))
        .with_state(state)
}
