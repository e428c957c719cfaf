//! Email-Verified Signup Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database and mail implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Workflow
//! - `POST /register` validates the form, stores a pending registration and
//!   mails a six-digit code valid for ten minutes
//! - A new submission for the same email replaces the pending one, so only
//!   the latest code verifies
//! - `POST /verify` checks the code, creates an inactive account, assigns
//!   the role for the chosen category and removes the pending registration
//! - Mail goes through a bounded background queue and never fails a request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SignupConfig;
pub use application::notifier::NotificationQueue;
pub use application::purge_expired::PurgeExpiredUseCase;
pub use error::{DispatchError, FieldError, SignupError, SignupResult};
pub use infra::{InMemorySignupRepository, PgSignupRepository, RelayDispatcher, TracingDispatcher};
pub use presentation::router::{signup_router, signup_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
