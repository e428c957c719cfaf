//! Domain Entities

pub mod account;
pub mod notification;
pub mod pending_registration;
