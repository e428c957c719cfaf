//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Injectable clock (system and manual)
//! - One-time code randomness and constant-time comparison
//! - Credential secret hashing (Argon2id) with zeroization

pub mod clock;
pub mod crypto;
pub mod password;
