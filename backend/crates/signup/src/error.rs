//! Signup Error Types
//!
//! This module provides signup-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Signup-specific result type alias
pub type SignupResult<T> = Result<T, SignupError>;

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request field name as the client sent it (camelCase)
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Signup-specific error variants
#[derive(Debug, Error)]
pub enum SignupError {
    /// Malformed registration or verification input
    #[error("Registration details are invalid")]
    Validation(Vec<FieldError>),

    /// Identity already has an account
    #[error("An account with this email already exists")]
    DuplicateAccount,

    /// Nothing pending for this identity
    #[error("No pending registration found, please restart")]
    PendingNotFound,

    /// Pending record is past its window
    #[error("Code expired, please restart")]
    CodeExpired,

    /// Submitted code differs from the stored one
    #[error("Invalid code")]
    CodeMismatch,

    /// Account repository failed while finalizing
    #[error("Account creation failed: {0}")]
    AccountCreation(String),

    /// Pending store backend failure
    #[error("Pending store error: {0}")]
    Store(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SignupError {
    /// Single-field validation failure
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        SignupError::Validation(vec![FieldError::new(field, message)])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignupError::Validation(_) => ErrorKind::BadRequest,
            SignupError::DuplicateAccount => ErrorKind::Conflict,
            SignupError::PendingNotFound => ErrorKind::NotFound,
            SignupError::CodeExpired => ErrorKind::Gone,
            SignupError::CodeMismatch => ErrorKind::UnprocessableEntity,
            SignupError::AccountCreation(_)
            | SignupError::Store(_)
            | SignupError::Database(_)
            | SignupError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// What the user should do next
    fn action(&self) -> Option<&'static str> {
        match self {
            SignupError::Validation(_) => Some("Correct the highlighted fields and resubmit"),
            SignupError::DuplicateAccount => Some("Sign in with the existing account"),
            SignupError::PendingNotFound | SignupError::CodeExpired => {
                Some("Submit the registration form again to receive a new code")
            }
            SignupError::CodeMismatch => Some("Check the code in the email and try again"),
            SignupError::AccountCreation(_) => Some("Try verifying again shortly"),
            _ => None,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; clients get a generic message.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            SignupError::AccountCreation(_) => "Account creation failed".to_string(),
            SignupError::Store(_) | SignupError::Database(_) | SignupError::Internal(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let mut err = AppError::new(self.kind(), message);
        if let Some(action) = self.action() {
            err = err.with_action(action);
        }
        if let SignupError::Validation(fields) = self {
            err = err.with_details(serde_json::to_value(fields).unwrap_or_default());
        }
        err
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            SignupError::Database(e) => {
                tracing::error!(error = %e, "Signup database error");
            }
            SignupError::Store(msg) => {
                tracing::error!(message = %msg, "Pending store error");
            }
            SignupError::AccountCreation(msg) => {
                tracing::error!(message = %msg, "Account creation failed");
            }
            SignupError::Internal(msg) => {
                tracing::error!(message = %msg, "Signup internal error");
            }
            SignupError::CodeMismatch => {
                tracing::warn!("Verification code mismatch");
            }
            _ => {
                tracing::debug!(error = %self, "Signup error");
            }
        }
    }
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<SignupError> for AppError {
    fn from(err: SignupError) -> Self {
        err.to_app_error()
    }
}

/// Notification dispatch failure
///
/// Never fails a registration or verification; only logged.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Relay unreachable or rejected the message
    #[error("Mail transport error: {0}")]
    Transport(String),

    /// Submission queue at capacity
    #[error("Notification queue is full")]
    QueueFull,

    /// Worker has shut down
    #[error("Notification worker is closed")]
    Closed,
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::Transport(err.to_string())
    }
}
