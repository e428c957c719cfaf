//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Request for POST /register
///
/// Missing fields deserialize as empty strings and are reported as field
/// errors rather than as a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub category: String,
}

/// Response for POST /register
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub identity: String,
    pub verify_url: String,
    /// Unix seconds
    pub expires_at: i64,
    pub message: &'static str,
}

/// Request for POST /verify
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// Response for POST /verify
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub identity: String,
    pub status: &'static str,
    pub message: &'static str,
}
