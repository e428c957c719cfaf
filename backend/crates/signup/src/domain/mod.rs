//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (PendingRegistration, Account, Notification)
//! - Domain value objects (Email, FullName, AuthorCategory, OtpCode)
//! - Repository traits (interfaces)

pub mod entity;
pub mod repository;
pub mod value_object;
