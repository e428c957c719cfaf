//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod identity_locks;
pub mod notifier;
pub mod purge_expired;
pub mod request_registration;
pub mod verify_registration;
