//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! signup backend:
//! - The unified error type and result alias
//! - Typed ID wrappers
//!
//! Only things whose meaning is the same in every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
