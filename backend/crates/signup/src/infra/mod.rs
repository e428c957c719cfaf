//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod mail;
pub mod memory;
pub mod postgres;

pub use mail::{RelayDispatcher, TracingDispatcher};
pub use memory::InMemorySignupRepository;
pub use postgres::PgSignupRepository;
